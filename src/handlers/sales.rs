// src/handlers/sales.rs

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
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::sales::{PlaceOrderPayload, Sale, SaleDetail, SalesStats, UpdateSaleStatusPayload},
};

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = PlaceOrderPayload,
    responses(
        (status = 201, description = "Compra realizada", body = SaleDetail),
        (status = 400, description = "Carrinho inválido ou produto indisponível"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn place_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<PlaceOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.place_order(user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

// GET /api/sales/my-sales
#[utoipa::path(
    get,
    path = "/api/sales/my-sales",
    tag = "Sales",
    responses(
        (status = 200, description = "Histórico de compras do usuário", body = [SaleDetail]),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_sales(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<SaleDetail>>, AppError> {
    let sales = app_state.sale_service.list_my_sales(user.id).await?;
    Ok(Json(sales))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Venda com itens", body = SaleDetail),
        (status = 403, description = "Venda de outro usuário"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SaleDetail>, AppError> {
    let sale = app_state.sale_service.get_sale(id, &user).await?;
    Ok(Json(sale))
}

// PUT /api/sales/{id}/status
#[utoipa::path(
    put,
    path = "/api/sales/{id}/status",
    tag = "Sales",
    request_body = UpdateSaleStatusPayload,
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Status atualizado", body = Sale),
        (status = 403, description = "Apenas administradores"),
        (status = 404, description = "Venda não encontrada"),
        (status = 409, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale_status(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSaleStatusPayload>,
) -> Result<Json<Sale>, AppError> {
    let sale = app_state.sale_service.update_status(id, payload.status).await?;
    Ok(Json(sale))
}

// GET /api/sales/stats
#[utoipa::path(
    get,
    path = "/api/sales/stats",
    tag = "Sales",
    responses(
        (status = 200, description = "Indicadores de vendas", body = SalesStats),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<SalesStats>, AppError> {
    let stats = app_state.sale_service.stats().await?;
    Ok(Json(stats))
}
