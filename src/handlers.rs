pub mod auth;
pub mod catalog;
pub mod contacts;
pub mod currencies;
pub mod dropdowns;
pub mod rbac;
pub mod tenancy;
pub mod users;
pub mod validation;
