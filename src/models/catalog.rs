// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_price};

// --- Produto (catálogo + saldo) ---
// O estoque vive na própria linha do produto; só é alterado por edição do
// admin ou pela baixa de uma venda.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Cafeteira Italiana")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "100.00")]
    pub price: Decimal,
    #[schema(example = 5)]
    pub stock: i32,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn has_stock(&self, quantity: i32) -> bool {
        self.stock >= quantity
    }
}

// Versão resumida anexada aos itens de venda
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            image_url: product.image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, message = "O nome deve ter no máximo 255 caracteres.")
    )]
    #[schema(example = "Cafeteira Italiana")]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_price"))]
    #[schema(example = "100.00")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)]
    pub stock: i32,

    #[validate(length(max = 500, message = "A URL da imagem deve ter no máximo 500 caracteres."))]
    pub image_url: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

// Atualização parcial: apenas os campos presentes são alterados
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, message = "O nome deve ter no máximo 255 caracteres.")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_price"))]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock: Option<i32>,

    #[validate(length(max = 500, message = "A URL da imagem deve ter no máximo 500 caracteres."))]
    pub image_url: Option<String>,

    pub is_active: Option<bool>,
}
