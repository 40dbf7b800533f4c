use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::models::sales::SaleStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Regras de negócio do checkout ---
    #[error("Produto com ID {product_id} não encontrado")]
    ProductNotFound { product_id: Uuid },

    #[error("O produto \"{name}\" não está disponível")]
    ProductInactive { product_id: Uuid, name: String },

    #[error("Estoque insuficiente para \"{name}\". Disponível: {available}")]
    InsufficientStock {
        product_id: Uuid,
        name: String,
        available: i32,
        requested: i32,
    },

    #[error("O produto possui vendas registradas e não pode ser removido; desative-o")]
    ProductHasSales { product_id: Uuid },

    // --- Lista de desejos ---
    #[error("Este produto já está na sua lista de desejos")]
    AlreadyInWishlist { product_id: Uuid },

    #[error("Produto não encontrado na sua lista de desejos")]
    WishlistItemNotFound { product_id: Uuid },

    // --- Vendas ---
    #[error("Venda não encontrada")]
    SaleNotFound,

    #[error("Transição de estado inválida: {} -> {}", from.as_str(), to.as_str())]
    InvalidStatusTransition { from: SaleStatus, to: SaleStatus },

    // --- Autenticação ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Senha atual incorreta")]
    CurrentPasswordMismatch,

    #[error("Usuário desativado")]
    UserInactive,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Acesso negado")]
    Forbidden,

    // Falhas de persistência: transação/commit. Nada foi gravado.
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ProductInactive { .. } => StatusCode::BAD_REQUEST,
            AppError::InsufficientStock { .. } => StatusCode::CONFLICT,
            AppError::ProductHasSales { .. } => StatusCode::CONFLICT,
            AppError::AlreadyInWishlist { .. } => StatusCode::CONFLICT,
            AppError::WishlistItemNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::SaleNotFound => StatusCode::NOT_FOUND,
            AppError::InvalidStatusTransition { .. } => StatusCode::CONFLICT,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::CurrentPasswordMismatch => StatusCode::UNAUTHORIZED,
            AppError::UserInactive => StatusCode::FORBIDDEN,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            AppError::ProductNotFound { product_id } => Some(json!({ "productId": product_id })),
            AppError::ProductInactive { product_id, name } => {
                Some(json!({ "productId": product_id, "productName": name }))
            }
            AppError::InsufficientStock { product_id, name, available, requested } => Some(json!({
                "productId": product_id,
                "productName": name,
                "available": available,
                "requested": requested,
            })),
            AppError::ProductHasSales { product_id }
            | AppError::AlreadyInWishlist { product_id }
            | AppError::WishlistItemNotFound { product_id } => Some(json!({ "productId": product_id })),
            AppError::InvalidStatusTransition { from, to } => {
                Some(json!({ "from": from, "to": to }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` registra o detalhe; o cliente recebe só a mensagem genérica.
            tracing::error!("Erro Interno do Servidor: {}", self);
            "Ocorreu um erro inesperado.".to_string()
        } else if let AppError::ValidationError(_) = self {
            "Um ou mais campos são inválidos.".to_string()
        } else {
            self.to_string()
        };

        let body = match self.details() {
            Some(details) => json!({ "error": message, "details": details }),
            None => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}
