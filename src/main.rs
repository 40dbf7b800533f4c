//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
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

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; "info" se não houver nada definido
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state);

    let listener = TcpListener::bind(&config.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(app_state: AppState) -> Router {
    // Registro e login são públicos; perfil e senha passam pelo auth_guard
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::get_me)
                .put(handlers::auth::update_me)
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        )
        .route(
            "/change-password",
            put(handlers::auth::change_password)
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    // Leitura do catálogo é pública; escrita exige admin ou editor (RequireCatalogManager)
    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).route_layer(
                axum_middleware::from_fn_with_state(app_state.clone(), auth_guard),
            ),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product).merge(
                put(handlers::products::update_product)
                    .delete(handlers::products::delete_product)
                    .route_layer(axum_middleware::from_fn_with_state(
                        app_state.clone(),
                        auth_guard,
                    )),
            ),
        );

    let wishlist_routes = Router::new()
        .route(
            "/",
            get(handlers::wishlist::list_wishlist)
                .post(handlers::wishlist::add_to_wishlist)
                .delete(handlers::wishlist::clear_wishlist),
        )
        .route("/{product_id}", delete(handlers::wishlist::remove_from_wishlist))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let sale_routes = Router::new()
        .route("/", post(handlers::sales::place_order))
        .route("/my-sales", get(handlers::sales::list_my_sales))
        .route("/stats", get(handlers::sales::get_stats))
        .route("/{id}", get(handlers::sales::get_sale))
        .route("/{id}/status", put(handlers::sales::update_sale_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/products", product_routes)
        .nest("/api/sales", sale_routes)
        .nest("/api/wishlist", wishlist_routes)
        .with_state(app_state)
}
