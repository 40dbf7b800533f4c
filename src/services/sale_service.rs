// src/services/sale_service.rs

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::{error::AppError, validation::MAX_AMOUNT},
    db::store::{SaleStore, TransactionalStore, UnitOfWork},
    models::{
        auth::User,
        catalog::Product,
        sales::{NewSale, PlaceOrderPayload, Sale, SaleDetail, SaleItemDetail, SaleItemDraft, SaleStatus, SalesStats},
    },
};

#[derive(Clone)]
pub struct SaleService<S> {
    store: S,
}

impl<S> SaleService<S>
where
    S: SaleStore + TransactionalStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // --- CHECKOUT ---
    // Tudo ou nada: qualquer falha desfaz as baixas de estoque já feitas
    // e nenhuma venda é gravada.
    pub async fn place_order(
        &self,
        user_id: Uuid,
        order: &PlaceOrderPayload,
    ) -> Result<SaleDetail, AppError> {
        // 0. Validação de entrada (antes de abrir a transação)
        order.validate()?;

        let mut uow = self.store.begin().await?;

        match Self::stage_order(&mut uow, user_id, order).await {
            Ok(detail) => {
                uow.commit().await?;
                tracing::info!(
                    sale_id = %detail.sale.id,
                    %user_id,
                    total = %detail.sale.total,
                    items = detail.items.len(),
                    "🛒 Venda registrada"
                );
                Ok(detail)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    tracing::error!("🔥 Falha no rollback da venda: {}", rollback_err);
                }
                tracing::warn!(%user_id, "Checkout abortado: {}", err);
                Err(err)
            }
        }
    }

    async fn stage_order(
        uow: &mut S::Tx,
        user_id: Uuid,
        order: &PlaceOrderPayload,
    ) -> Result<SaleDetail, AppError> {
        // 1. Trava todos os produtos do carrinho de uma vez (em ordem de id)
        let ids: Vec<Uuid> = order.items.iter().map(|line| line.product_id).collect();
        let mut locked: HashMap<Uuid, Product> = uow
            .lock_products(&ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        let mut total = Decimal::ZERO;
        let mut drafts = Vec::with_capacity(order.items.len());

        // 2. Valida e precifica cada linha, na ordem enviada
        for line in &order.items {
            let product = locked
                .get(&line.product_id)
                .cloned()
                .ok_or(AppError::ProductNotFound { product_id: line.product_id })?;

            if !product.is_active {
                return Err(AppError::ProductInactive { product_id: product.id, name: product.name });
            }

            if !product.has_stock(line.quantity) {
                return Err(AppError::InsufficientStock {
                    product_id: product.id,
                    available: product.stock,
                    requested: line.quantity,
                    name: product.name,
                });
            }

            let draft = SaleItemDraft::price(&product, line.quantity);
            total += draft.subtotal;
            if total > MAX_AMOUNT {
                return Err(order_total_too_large());
            }

            // 3. Baixa condicional (revalida o saldo dentro da transação)
            match uow.decrement_stock(product.id, line.quantity).await? {
                // Linhas repetidas do mesmo produto enxergam o saldo já baixado
                Some(updated) => {
                    locked.insert(updated.id, updated);
                }
                None => {
                    return Err(AppError::InsufficientStock {
                        product_id: product.id,
                        available: product.stock,
                        requested: line.quantity,
                        name: product.name,
                    });
                }
            }

            drafts.push(draft);
        }

        // 4. Grava a venda e os itens
        let sale = uow
            .insert_sale(&NewSale {
                user_id,
                total,
                shipping_address: order.shipping_address.trim().to_string(),
            })
            .await?;

        let mut items = Vec::with_capacity(drafts.len());
        for (position, draft) in drafts.into_iter().enumerate() {
            let item = uow.insert_sale_item(sale.id, position as i32, &draft).await?;
            items.push(SaleItemDetail { item, product: draft.product });
        }

        Ok(SaleDetail { sale, items })
    }

    // --- CONSULTAS ---

    pub async fn list_my_sales(&self, user_id: Uuid) -> Result<Vec<SaleDetail>, AppError> {
        self.store.list_sales_for_user(user_id).await
    }

    /// Admin vê qualquer venda; cliente só as próprias.
    pub async fn get_sale(&self, id: Uuid, caller: &User) -> Result<SaleDetail, AppError> {
        let detail = self.store.find_sale(id).await?.ok_or(AppError::SaleNotFound)?;

        if !caller.is_admin() && detail.sale.user_id != caller.id {
            return Err(AppError::Forbidden);
        }
        Ok(detail)
    }

    // --- ADMINISTRAÇÃO ---

    pub async fn update_status(&self, id: Uuid, next: SaleStatus) -> Result<Sale, AppError> {
        let current = self.store.find_sale(id).await?.ok_or(AppError::SaleNotFound)?.sale;

        if !current.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition { from: current.status, to: next });
        }

        match self.store.transition_sale_status(id, current.status, next).await? {
            Some(sale) => {
                tracing::info!(sale_id = %id, from = current.status.as_str(), to = next.as_str(), "Status da venda atualizado");
                Ok(sale)
            }
            // Outro admin mudou o status entre a leitura e a escrita
            None => {
                let latest = self.store.find_sale(id).await?.ok_or(AppError::SaleNotFound)?.sale;
                Err(AppError::InvalidStatusTransition { from: latest.status, to: next })
            }
        }
    }

    pub async fn stats(&self) -> Result<SalesStats, AppError> {
        self.store.sales_stats().await
    }
}

fn order_total_too_large() -> AppError {
    let mut err = ValidationError::new("range");
    err.add_param("max".into(), &MAX_AMOUNT.to_string());
    err.message = Some("O total do pedido excede o máximo permitido (99999999.99).".into());

    let mut errors = ValidationErrors::new();
    errors.add("items", err);
    AppError::ValidationError(errors)
}
