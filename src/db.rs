pub mod scope;

pub mod billing_repo;
pub use billing_repo::BillingRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod contact_repo;
pub use contact_repo::ContactRepository;
pub mod currency_repo;
pub use currency_repo::CurrencyRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
