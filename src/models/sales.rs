// src/models/sales.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::validation::validate_not_blank,
    models::catalog::{Product, ProductSummary},
};

// --- Enums ---
// Enumeração canônica (inglês) usada tanto no banco quanto no JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sale_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Completed,
    Cancelled,
}

impl SaleStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SaleStatus::Completed | SaleStatus::Cancelled)
    }

    /// `pending` é o único estado com saída; `completed` e `cancelled` são finais.
    pub fn can_transition_to(self, next: SaleStatus) -> bool {
        self == SaleStatus::Pending && next.is_terminal()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Completed => "completed",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

// --- Registros persistidos ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "200.00")]
    pub total: Decimal,
    pub status: SaleStatus,
    #[schema(example = "123 Main St")]
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    /// Posição da linha no carrinho original (0, 1, 2...).
    pub position: i32,
    #[schema(example = 2)]
    pub quantity: i32,
    /// Preço unitário congelado no momento da compra.
    #[schema(example = "100.00")]
    pub price: Decimal,
    #[schema(example = "200.00")]
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
}

// --- Estruturas de leitura (com o produto resolvido) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDetail {
    #[serde(flatten)]
    pub item: SaleItem,
    pub product: ProductSummary,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItemDetail>,
}

impl SaleDetail {
    /// Agrupa os itens em suas vendas, preservando a ordem de `sales`.
    pub fn assemble(sales: Vec<Sale>, items: Vec<SaleItemDetail>) -> Vec<SaleDetail> {
        let mut by_sale: HashMap<Uuid, Vec<SaleItemDetail>> = HashMap::new();
        for item in items {
            by_sale.entry(item.item.sale_id).or_default().push(item);
        }

        sales
            .into_iter()
            .map(|sale| {
                let items = by_sale.remove(&sale.id).unwrap_or_default();
                SaleDetail { sale, items }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_sales: i64,
    pub completed_sales: i64,
    pub pending_sales: i64,
    pub cancelled_sales: i64,
    /// Soma apenas das vendas concluídas.
    pub total_revenue: Decimal,
}

// --- Entrada do checkout ---

// Corpo do checkout em snake_case (`product_id`, `shipping_address`), como o
// cliente web envia; as grafias camelCase também são aceitas.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    #[serde(alias = "productId")]
    pub product_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderPayload {
    #[validate(
        length(min = 1, message = "Adicione pelo menos um produto."),
        custom(function = "validate_cart_lines")
    )]
    pub items: Vec<CartLine>,

    #[validate(custom(function = "validate_not_blank"))]
    #[serde(alias = "shippingAddress")]
    #[schema(example = "123 Main St")]
    pub shipping_address: String,
}

fn validate_cart_lines(items: &[CartLine]) -> Result<(), ValidationError> {
    if items.iter().any(|line| line.quantity < 1) {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &1);
        err.message = Some("A quantidade deve ser pelo menos 1.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSaleStatusPayload {
    pub status: SaleStatus,
}

// --- Estruturas internas do fluxo de venda ---

/// Linha de venda precificada, ainda não persistida.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleItemDraft {
    pub product: ProductSummary,
    pub quantity: i32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

impl SaleItemDraft {
    /// Congela o preço atual do produto e calcula o subtotal.
    pub fn price(product: &Product, quantity: i32) -> Self {
        Self {
            product: ProductSummary::from(product),
            quantity,
            price: product.price,
            subtotal: line_subtotal(product.price, quantity),
        }
    }
}

pub fn line_subtotal(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub user_id: Uuid,
    pub total: Decimal,
    pub shipping_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: Decimal) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Cafeteira".into(),
            description: None,
            price,
            stock: 10,
            image_url: None,
            is_active: true,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn subtotal_is_price_times_quantity() {
        assert_eq!(line_subtotal(Decimal::new(1999, 2), 3), Decimal::new(5997, 2));
        assert_eq!(line_subtotal(Decimal::ZERO, 7), Decimal::ZERO);
    }

    #[test]
    fn draft_copies_the_current_price() {
        let mut p = product(Decimal::new(10000, 2));
        let draft = SaleItemDraft::price(&p, 2);
        p.price = Decimal::new(50, 0);

        assert_eq!(draft.price, Decimal::new(10000, 2));
        assert_eq!(draft.subtotal, Decimal::new(20000, 2));
        assert_eq!(draft.product.id, p.id);
    }

    #[test]
    fn only_pending_sales_can_change_status() {
        use SaleStatus::*;

        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Pending));
    }

    #[test]
    fn payload_rejects_empty_cart_and_blank_address() {
        let payload = PlaceOrderPayload {
            items: vec![],
            shipping_address: "   ".into(),
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("items"));
        assert!(fields.contains_key("shipping_address"));
    }

    #[test]
    fn payload_rejects_non_positive_quantity() {
        let payload = PlaceOrderPayload {
            items: vec![CartLine { product_id: Uuid::new_v4(), quantity: 0 }],
            shipping_address: "123 Main St".into(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn checkout_body_uses_snake_case_fields() {
        let body = r#"{
            "items": [{ "product_id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "quantity": 2 }],
            "shipping_address": "123 Main St"
        }"#;
        let payload: PlaceOrderPayload = serde_json::from_str(body).unwrap();

        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].product_id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert_eq!(payload.items[0].quantity, 2);
        assert_eq!(payload.shipping_address, "123 Main St");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn checkout_body_also_accepts_camel_case() {
        let body = r#"{
            "items": [{ "productId": "67e55044-10b1-426f-9247-bb680e5fe0c8", "quantity": 1 }],
            "shippingAddress": "123 Main St"
        }"#;
        let payload: PlaceOrderPayload = serde_json::from_str(body).unwrap();

        assert_eq!(payload.items[0].quantity, 1);
        assert_eq!(payload.shipping_address, "123 Main St");
    }

    #[test]
    fn status_uses_canonical_english_names() {
        assert_eq!(serde_json::to_string(&SaleStatus::Cancelled).unwrap(), "\"cancelled\"");
        let parsed: SaleStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, SaleStatus::Completed);
        assert!(serde_json::from_str::<SaleStatus>("\"completada\"").is_err());
    }
}
