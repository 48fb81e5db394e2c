//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env é opcional: em produção as variáveis vêm do ambiente.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(protected_routes(app_state.clone()))
        .with_state(app_state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

// Tudo abaixo de /api exige um Bearer válido.
fn protected_routes(app_state: AppState) -> Router<AppState> {
    let me_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/locations", get(handlers::auth::get_my_locations))
        .route("/me/subscription", get(handlers::auth::get_subscription))
        .route("/me/subscription/{plan}", get(handlers::auth::subscribed_to_plan))
        .route("/me/plan", post(handlers::auth::switch_plan));

    let user_routes = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users/{id}/selected-contacts", get(handlers::users::selected_contacts))
        .route("/users/{id}/locations", put(handlers::rbac::set_user_locations))
        .route("/permissions", get(handlers::rbac::list_permissions));

    let dropdown_routes = Router::new()
        .route("/units", get(handlers::dropdowns::units))
        .route("/brands", get(handlers::dropdowns::brands))
        .route("/users", get(handlers::dropdowns::users))
        .route("/commission-agents", get(handlers::dropdowns::commission_agents))
        .route("/all-users", get(handlers::dropdowns::all_users))
        .route("/customer-groups", get(handlers::dropdowns::customer_groups))
        .route("/currencies", get(handlers::dropdowns::currencies));

    let contact_routes = Router::new()
        .route(
            "/contacts",
            get(handlers::contacts::list_contacts).post(handlers::contacts::create_contact),
        )
        .route(
            "/contacts/{id}",
            get(handlers::contacts::get_contact)
                .put(handlers::contacts::update_contact)
                .delete(handlers::contacts::delete_contact),
        );

    let tenancy_routes = Router::new()
        .route(
            "/businesses",
            get(handlers::tenancy::list_businesses).post(handlers::tenancy::create_business),
        )
        .route(
            "/businesses/{id}",
            put(handlers::tenancy::update_business).delete(handlers::tenancy::delete_business),
        )
        .route(
            "/locations",
            get(handlers::tenancy::list_locations).post(handlers::tenancy::create_location),
        )
        .route("/locations/{id}/access", get(handlers::tenancy::location_access));

    let currency_routes = Router::new()
        .route(
            "/currencies",
            get(handlers::currencies::list_currencies).post(handlers::currencies::create_currency),
        )
        .route(
            "/currencies/{id}",
            put(handlers::currencies::update_currency).delete(handlers::currencies::delete_currency),
        );

    let catalog_routes = Router::new()
        .route(
            "/units",
            get(handlers::catalog::list_units).post(handlers::catalog::create_unit),
        )
        .route("/units/{id}", axum::routing::delete(handlers::catalog::delete_unit))
        .route(
            "/brands",
            get(handlers::catalog::list_brands).post(handlers::catalog::create_brand),
        )
        .route("/brands/{id}", axum::routing::delete(handlers::catalog::delete_brand));

    let api = Router::new()
        .merge(me_routes)
        .merge(user_routes)
        .nest("/dropdowns", dropdown_routes)
        .merge(contact_routes)
        .merge(tenancy_routes)
        .merge(currency_routes)
        .merge(catalog_routes)
        .layer(axum_middleware::from_fn_with_state(app_state, auth_guard));

    Router::new().nest("/api", api)
}
