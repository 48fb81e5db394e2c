pub mod access;
pub mod auth;
pub mod billing;
pub mod catalog;
pub mod contacts;
pub mod currency;
pub mod dropdown;
pub mod rbac;
pub mod tenancy;
