// src/handlers/wishlist.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::wishlist::{AddToWishlistPayload, WishlistEntry},
};

// GET /api/wishlist
#[utoipa::path(
    get,
    path = "/api/wishlist",
    tag = "Wishlist",
    responses(
        (status = 200, description = "Lista de desejos do usuário", body = [WishlistEntry]),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_wishlist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<WishlistEntry>>, AppError> {
    let entries = app_state.wishlist_service.list(user.id).await?;
    Ok(Json(entries))
}

// POST /api/wishlist
#[utoipa::path(
    post,
    path = "/api/wishlist",
    tag = "Wishlist",
    request_body = AddToWishlistPayload,
    responses(
        (status = 201, description = "Produto adicionado", body = WishlistEntry),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Produto já está na lista")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_to_wishlist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AddToWishlistPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state.wishlist_service.add(user.id, payload.product_id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// DELETE /api/wishlist/{product_id}
#[utoipa::path(
    delete,
    path = "/api/wishlist/{product_id}",
    tag = "Wishlist",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido da lista"),
        (status = 404, description = "Produto não está na lista")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_from_wishlist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(product_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.wishlist_service.remove(user.id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/wishlist
#[utoipa::path(
    delete,
    path = "/api/wishlist",
    tag = "Wishlist",
    responses((status = 204, description = "Lista esvaziada")),
    security(("api_jwt" = []))
)]
pub async fn clear_wishlist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<StatusCode, AppError> {
    app_state.wishlist_service.clear(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
