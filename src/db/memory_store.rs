// src/db/memory_store.rs
//
// Store em memória para os testes dos serviços. Uma unidade de trabalho
// segura o lock global do início ao fim e trabalha sobre uma cópia do estado:
// o commit substitui o estado, o rollback (ou drop) descarta a cópia.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CatalogStore, SaleStore, TransactionalStore, UnitOfWork, WishlistStore},
    models::{
        catalog::{CreateProductPayload, Product, ProductSummary, UpdateProductPayload},
        sales::{
            NewSale, Sale, SaleDetail, SaleItem, SaleItemDetail, SaleItemDraft, SaleStatus,
            SalesStats,
        },
        wishlist::{WishlistEntry, WishlistItem},
    },
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    products: HashMap<Uuid, Product>,
    sales: Vec<Sale>,
    items: Vec<SaleItem>,
    wishlists: Vec<WishlistItem>,
}

impl MemoryState {
    fn item_details(&self, sale_ids: &[Uuid]) -> Vec<SaleItemDetail> {
        let mut items: Vec<&SaleItem> =
            self.items.iter().filter(|i| sale_ids.contains(&i.sale_id)).collect();
        items.sort_by_key(|i| i.position);

        items
            .into_iter()
            .map(|item| {
                let product = self
                    .products
                    .get(&item.product_id)
                    .map(ProductSummary::from)
                    .unwrap_or(ProductSummary { id: item.product_id, name: String::new(), image_url: None });
                SaleItemDetail { item: item.clone(), product }
            })
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_product(&self, name: &str, price: Decimal, stock: i32, is_active: bool) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price,
            stock,
            image_url: None,
            is_active,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.products.insert(product.id, product.clone());
        product
    }

    pub async fn stock_of(&self, id: Uuid) -> Option<i32> {
        self.state.lock().await.products.get(&id).map(|p| p.stock)
    }

    pub async fn sale_count(&self) -> usize {
        self.state.lock().await.sales.len()
    }

    pub async fn sale_item_count(&self) -> usize {
        self.state.lock().await.items.len()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn create_product(
        &self,
        created_by: Uuid,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: payload.name.trim().to_string(),
            description: payload.description.clone(),
            price: payload.price,
            stock: payload.stock,
            image_url: payload.image_url.clone(),
            is_active: payload.is_active,
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError> {
        let mut state = self.state.lock().await;
        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = &changes.description {
            product.description = Some(description.clone());
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(image_url) = &changes.image_url {
            product.image_url = Some(image_url.clone());
        }
        if let Some(is_active) = changes.is_active {
            product.is_active = is_active;
        }
        product.updated_at = Utc::now();

        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&id) {
            return Ok(false);
        }
        if state.items.iter().any(|item| item.product_id == id) {
            return Err(AppError::ProductHasSales { product_id: id });
        }

        state.products.remove(&id);
        state.wishlists.retain(|w| w.product_id != id);
        Ok(true)
    }
}

#[async_trait]
impl WishlistStore for MemoryStore {
    async fn list_wishlist(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, AppError> {
        let state = self.state.lock().await;
        Ok(state
            .wishlists
            .iter()
            .rev()
            .filter(|w| w.user_id == user_id)
            .filter_map(|w| {
                let product = state.products.get(&w.product_id)?.clone();
                Some(WishlistEntry { item: w.clone(), product })
            })
            .collect())
    }

    async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistItem, AppError> {
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&product_id) {
            return Err(AppError::ProductNotFound { product_id });
        }
        if state.wishlists.iter().any(|w| w.user_id == user_id && w.product_id == product_id) {
            return Err(AppError::AlreadyInWishlist { product_id });
        }

        let item = WishlistItem { id: Uuid::new_v4(), user_id, product_id, created_at: Utc::now() };
        state.wishlists.push(item.clone());
        Ok(item)
    }

    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.lock().await;
        let before = state.wishlists.len();
        state.wishlists.retain(|w| !(w.user_id == user_id && w.product_id == product_id));
        Ok(state.wishlists.len() < before)
    }

    async fn clear_wishlist(&self, user_id: Uuid) -> Result<u64, AppError> {
        let mut state = self.state.lock().await;
        let before = state.wishlists.len();
        state.wishlists.retain(|w| w.user_id != user_id);
        Ok((before - state.wishlists.len()) as u64)
    }
}

#[async_trait]
impl SaleStore for MemoryStore {
    async fn find_sale(&self, id: Uuid) -> Result<Option<SaleDetail>, AppError> {
        let state = self.state.lock().await;
        let Some(sale) = state.sales.iter().find(|s| s.id == id).cloned() else {
            return Ok(None);
        };
        let items = state.item_details(&[id]);
        Ok(SaleDetail::assemble(vec![sale], items).pop())
    }

    async fn list_sales_for_user(&self, user_id: Uuid) -> Result<Vec<SaleDetail>, AppError> {
        let state = self.state.lock().await;
        // Inseridas em ordem cronológica; a mais recente vem primeiro
        let sales: Vec<Sale> = state.sales.iter().rev().filter(|s| s.user_id == user_id).cloned().collect();
        let ids: Vec<Uuid> = sales.iter().map(|s| s.id).collect();
        let items = state.item_details(&ids);
        Ok(SaleDetail::assemble(sales, items))
    }

    async fn transition_sale_status(
        &self,
        id: Uuid,
        expected: SaleStatus,
        next: SaleStatus,
    ) -> Result<Option<Sale>, AppError> {
        let mut state = self.state.lock().await;
        let Some(sale) = state.sales.iter_mut().find(|s| s.id == id && s.status == expected) else {
            return Ok(None);
        };
        sale.status = next;
        sale.updated_at = Utc::now();
        Ok(Some(sale.clone()))
    }

    async fn sales_stats(&self) -> Result<SalesStats, AppError> {
        let state = self.state.lock().await;
        let count = |status: SaleStatus| state.sales.iter().filter(|s| s.status == status).count() as i64;

        Ok(SalesStats {
            total_sales: state.sales.len() as i64,
            completed_sales: count(SaleStatus::Completed),
            pending_sales: count(SaleStatus::Pending),
            cancelled_sales: count(SaleStatus::Cancelled),
            total_revenue: state
                .sales
                .iter()
                .filter(|s| s.status == SaleStatus::Completed)
                .map(|s| s.total)
                .sum(),
        })
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl TransactionalStore for MemoryStore {
    type Tx = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(MemoryUnitOfWork { guard, staged })
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_products(&mut self, ids: &[Uuid]) -> Result<Vec<Product>, AppError> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        Ok(ids.iter().filter_map(|id| self.staged.products.get(id).cloned()).collect())
    }

    async fn decrement_stock(&mut self, id: Uuid, quantity: i32) -> Result<Option<Product>, AppError> {
        match self.staged.products.get_mut(&id) {
            Some(product) if product.stock >= quantity => {
                product.stock -= quantity;
                product.updated_at = Utc::now();
                Ok(Some(product.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn insert_sale(&mut self, sale: &NewSale) -> Result<Sale, AppError> {
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4(),
            user_id: sale.user_id,
            total: sale.total,
            status: SaleStatus::Pending,
            shipping_address: sale.shipping_address.clone(),
            created_at: now,
            updated_at: now,
        };
        self.staged.sales.push(sale.clone());
        Ok(sale)
    }

    async fn insert_sale_item(
        &mut self,
        sale_id: Uuid,
        position: i32,
        item: &SaleItemDraft,
    ) -> Result<SaleItem, AppError> {
        let item = SaleItem {
            id: Uuid::new_v4(),
            sale_id,
            product_id: item.product.id,
            position,
            quantity: item.quantity,
            price: item.price,
            subtotal: item.subtotal,
            created_at: Utc::now(),
        };
        self.staged.items.push(item.clone());
        Ok(item)
    }

    async fn commit(self) -> Result<(), AppError> {
        let MemoryUnitOfWork { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropped_unit_of_work_leaves_state_untouched() {
        let store = MemoryStore::new();
        let product = store.seed_product("Caneca", Decimal::new(2500, 2), 3, true).await;

        {
            let mut uow = store.begin().await.unwrap();
            assert!(uow.decrement_stock(product.id, 2).await.unwrap().is_some());
        }

        assert_eq!(store.stock_of(product.id).await, Some(3));
    }

    #[tokio::test]
    async fn locks_each_known_product_once_in_id_order() {
        let store = MemoryStore::new();
        let a = store.seed_product("A", Decimal::ONE, 1, true).await;
        let b = store.seed_product("B", Decimal::ONE, 1, true).await;
        let c = store.seed_product("C", Decimal::ONE, 1, true).await;

        let mut uow = store.begin().await.unwrap();
        let locked = uow
            .lock_products(&[c.id, a.id, Uuid::new_v4(), c.id, b.id])
            .await
            .unwrap();

        let mut expected = vec![a.id, b.id, c.id];
        expected.sort_unstable();
        assert_eq!(locked.iter().map(|p| p.id).collect::<Vec<_>>(), expected);
    }

    #[tokio::test]
    async fn conditional_decrement_refuses_to_go_negative() {
        let store = MemoryStore::new();
        let product = store.seed_product("Caneca", Decimal::new(2500, 2), 1, true).await;

        let mut uow = store.begin().await.unwrap();
        assert!(uow.decrement_stock(product.id, 2).await.unwrap().is_none());
        assert_eq!(uow.decrement_stock(product.id, 1).await.unwrap().map(|p| p.stock), Some(0));
        uow.commit().await.unwrap();

        assert_eq!(store.stock_of(product.id).await, Some(0));
    }
}
