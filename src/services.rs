pub mod access_service;
pub mod auth;
pub mod business_service;
pub mod catalog_service;
pub mod contact_service;
pub mod currency_service;
pub mod dropdown_service;
pub mod subscription_service;
pub mod user_service;
