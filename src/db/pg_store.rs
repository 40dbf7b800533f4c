// src/db/pg_store.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        store::{CatalogStore, SaleStore, TransactionalStore, UnitOfWork, WishlistStore},
        ProductRepository, SaleRepository, WishlistRepository,
    },
    models::{
        catalog::{CreateProductPayload, Product, UpdateProductPayload},
        sales::{NewSale, Sale, SaleDetail, SaleItem, SaleItemDraft, SaleStatus, SalesStats},
        wishlist::{WishlistEntry, WishlistItem},
    },
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    products: ProductRepository,
    sales: SaleRepository,
    wishlists: WishlistRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            products: ProductRepository::new(),
            sales: SaleRepository::new(),
            wishlists: WishlistRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        self.products.find_by_id(&self.pool, id).await
    }

    async fn create_product(
        &self,
        created_by: Uuid,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError> {
        self.products.create(&self.pool, created_by, payload).await
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError> {
        self.products.update(&self.pool, id, changes).await
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError> {
        self.products.delete(&self.pool, id).await
    }
}

#[async_trait]
impl WishlistStore for PgStore {
    async fn list_wishlist(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, AppError> {
        self.wishlists.list_by_user(&self.pool, user_id).await
    }

    async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistItem, AppError> {
        self.wishlists.insert(&self.pool, user_id, product_id).await
    }

    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, AppError> {
        self.wishlists.delete(&self.pool, user_id, product_id).await
    }

    async fn clear_wishlist(&self, user_id: Uuid) -> Result<u64, AppError> {
        self.wishlists.clear(&self.pool, user_id).await
    }
}

#[async_trait]
impl SaleStore for PgStore {
    async fn find_sale(&self, id: Uuid) -> Result<Option<SaleDetail>, AppError> {
        let Some(sale) = self.sales.find_by_id(&self.pool, id).await? else {
            return Ok(None);
        };
        let items = self.sales.items_for_sales(&self.pool, &[sale.id]).await?;

        Ok(SaleDetail::assemble(vec![sale], items).pop())
    }

    async fn list_sales_for_user(&self, user_id: Uuid) -> Result<Vec<SaleDetail>, AppError> {
        let sales = self.sales.list_by_user(&self.pool, user_id).await?;
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = sales.iter().map(|s| s.id).collect();
        let items = self.sales.items_for_sales(&self.pool, &ids).await?;

        Ok(SaleDetail::assemble(sales, items))
    }

    async fn transition_sale_status(
        &self,
        id: Uuid,
        expected: SaleStatus,
        next: SaleStatus,
    ) -> Result<Option<Sale>, AppError> {
        self.sales.transition_status(&self.pool, id, expected, next).await
    }

    async fn sales_stats(&self) -> Result<SalesStats, AppError> {
        self.sales.stats(&self.pool).await
    }
}

// ---
// Unidade de trabalho sobre uma transação do Postgres
// ---

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
    products: ProductRepository,
    sales: SaleRepository,
}

#[async_trait]
impl TransactionalStore for PgStore {
    type Tx = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgUnitOfWork {
            tx,
            products: self.products.clone(),
            sales: self.sales.clone(),
        })
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_products(&mut self, ids: &[Uuid]) -> Result<Vec<Product>, AppError> {
        // SELECT ... FOR UPDATE: pedidos concorrentes nos mesmos produtos esperam aqui
        self.products.lock_for_update(&mut *self.tx, ids).await
    }

    async fn decrement_stock(&mut self, id: Uuid, quantity: i32) -> Result<Option<Product>, AppError> {
        self.products.decrement_stock(&mut *self.tx, id, quantity).await
    }

    async fn insert_sale(&mut self, sale: &NewSale) -> Result<Sale, AppError> {
        self.sales.insert_sale(&mut *self.tx, sale).await
    }

    async fn insert_sale_item(
        &mut self,
        sale_id: Uuid,
        position: i32,
        item: &SaleItemDraft,
    ) -> Result<SaleItem, AppError> {
        self.sales.insert_item(&mut *self.tx, sale_id, position, item).await
    }

    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
