// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::update_me,
        handlers::auth::change_password,

        // --- Catalog ---
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Sales ---
        handlers::sales::place_order,
        handlers::sales::list_my_sales,
        handlers::sales::get_sale,
        handlers::sales::update_sale_status,
        handlers::sales::get_stats,

        // --- Wishlist ---
        handlers::wishlist::list_wishlist,
        handlers::wishlist::add_to_wishlist,
        handlers::wishlist::remove_from_wishlist,
        handlers::wishlist::clear_wishlist,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::UpdateProfilePayload,
            models::auth::ChangePasswordPayload,

            // --- Catalog ---
            models::catalog::Product,
            models::catalog::ProductSummary,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,

            // --- Sales ---
            models::sales::SaleStatus,
            models::sales::Sale,
            models::sales::SaleItem,
            models::sales::SaleItemDetail,
            models::sales::SaleDetail,
            models::sales::SalesStats,
            models::sales::CartLine,
            models::sales::PlaceOrderPayload,
            models::sales::UpdateSaleStatusPayload,

            // --- Wishlist ---
            models::wishlist::WishlistItem,
            models::wishlist::WishlistEntry,
            models::wishlist::AddToWishlistPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Catalog", description = "Produtos da loja"),
        (name = "Sales", description = "Compras, histórico e indicadores"),
        (name = "Wishlist", description = "Lista de desejos do usuário")
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
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
