// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_my_locations,
        handlers::auth::get_subscription,
        handlers::auth::subscribed_to_plan,
        handlers::auth::switch_plan,
        handlers::users::list_users,
        handlers::users::selected_contacts,

        // --- Dropdowns ---
        handlers::dropdowns::units,
        handlers::dropdowns::brands,
        handlers::dropdowns::users,
        handlers::dropdowns::commission_agents,
        handlers::dropdowns::all_users,
        handlers::dropdowns::customer_groups,
        handlers::dropdowns::currencies,

        // --- Contacts ---
        handlers::contacts::list_contacts,
        handlers::contacts::get_contact,
        handlers::contacts::create_contact,
        handlers::contacts::update_contact,
        handlers::contacts::delete_contact,

        // --- Businesses / Locations ---
        handlers::tenancy::list_businesses,
        handlers::tenancy::create_business,
        handlers::tenancy::update_business,
        handlers::tenancy::delete_business,
        handlers::tenancy::list_locations,
        handlers::tenancy::create_location,
        handlers::tenancy::location_access,

        // --- Currencies ---
        handlers::currencies::list_currencies,
        handlers::currencies::create_currency,
        handlers::currencies::update_currency,
        handlers::currencies::delete_currency,

        // --- Catalog ---
        handlers::catalog::list_units,
        handlers::catalog::create_unit,
        handlers::catalog::delete_unit,
        handlers::catalog::list_brands,
        handlers::catalog::create_brand,
        handlers::catalog::delete_brand,

        // --- RBAC ---
        handlers::rbac::list_permissions,
        handlers::rbac::set_user_locations,
    ),
    components(
        schemas(
            // --- Users ---
            models::auth::User,
            models::auth::Profile,
            models::billing::Plan,
            models::billing::SubscriptionStatus,
            models::billing::BillingCycle,
            models::billing::Subscription,
            models::billing::SubscriptionSummary,
            handlers::auth::SwitchPlanPayload,

            // --- Dropdowns ---
            models::dropdown::DropdownOption,

            // --- Contacts ---
            models::contacts::ContactType,
            models::contacts::ContactKind,
            models::contacts::PayTermType,
            models::contacts::Contact,
            handlers::contacts::ContactPayload,

            // --- Businesses / Locations ---
            models::tenancy::AccountingMethod,
            models::tenancy::Business,
            models::tenancy::BusinessListing,
            models::tenancy::BusinessLocation,
            handlers::tenancy::BusinessPayload,
            handlers::tenancy::CreateLocationPayload,

            // --- Currencies ---
            models::currency::Currency,
            handlers::currencies::CurrencyPayload,

            // --- Catalog ---
            models::catalog::Unit,
            models::catalog::UnitWithSubUnits,
            models::catalog::Brand,
            models::catalog::CustomerGroup,
            handlers::catalog::UnitPayload,
            handlers::catalog::BrandPayload,

            // --- RBAC ---
            models::rbac::Permission,
            models::rbac::SetUserLocationsPayload,
        )
    ),
    tags(
        (name = "Users", description = "Dados do Usuário, Perfil e Assinatura"),
        (name = "Dropdowns", description = "Listas de opções para formulários"),
        (name = "Contacts", description = "Clientes e Fornecedores"),
        (name = "Businesses", description = "Gestão de Empresas"),
        (name = "Locations", description = "Locais da Empresa e acesso por local"),
        (name = "Currencies", description = "Moedas (globais)"),
        (name = "Catalog", description = "Unidades de Medida e Marcas"),
        (name = "RBAC", description = "Controle de Acesso (Permissões)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented_with_bearer_auth() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/dropdowns/units"));
        assert!(doc.paths.paths.contains_key("/api/users/{id}/locations"));
        let schemes = &doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("api_jwt"));
    }
}
