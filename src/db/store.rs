// src/db/store.rs
//
// Contratos de persistência consumidos pelos serviços. O checkout só enxerga
// `TransactionalStore` / `UnitOfWork`: catálogo e vendas compartilham a mesma
// fronteira transacional.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        catalog::{CreateProductPayload, Product, UpdateProductPayload},
        sales::{NewSale, Sale, SaleDetail, SaleItem, SaleItemDraft, SaleStatus, SalesStats},
        wishlist::{WishlistEntry, WishlistItem},
    },
};

#[async_trait]
pub trait CatalogStore: Clone + Send + Sync + 'static {
    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    async fn create_product(
        &self,
        created_by: Uuid,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError>;

    async fn update_product(
        &self,
        id: Uuid,
        changes: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError>;

    /// `false` se o produto não existe. Produtos já vendidos falham com
    /// `ProductHasSales`: o histórico de vendas referencia a linha.
    async fn delete_product(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait WishlistStore: Clone + Send + Sync + 'static {
    /// Mais recentes primeiro.
    async fn list_wishlist(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, AppError>;

    /// Falha com `AlreadyInWishlist` se o par usuário/produto já existe.
    async fn add_to_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistItem, AppError>;

    async fn remove_from_wishlist(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, AppError>;

    async fn clear_wishlist(&self, user_id: Uuid) -> Result<u64, AppError>;
}

#[async_trait]
pub trait SaleStore: Clone + Send + Sync + 'static {
    async fn find_sale(&self, id: Uuid) -> Result<Option<SaleDetail>, AppError>;

    /// Mais recentes primeiro.
    async fn list_sales_for_user(&self, user_id: Uuid) -> Result<Vec<SaleDetail>, AppError>;

    /// Compare-and-set: `None` se a venda não existe ou não está mais em `expected`.
    async fn transition_sale_status(
        &self,
        id: Uuid,
        expected: SaleStatus,
        next: SaleStatus,
    ) -> Result<Option<Sale>, AppError>;

    async fn sales_stats(&self) -> Result<SalesStats, AppError>;
}

#[async_trait]
pub trait TransactionalStore: Send + Sync {
    type Tx: UnitOfWork;

    async fn begin(&self) -> Result<Self::Tx, AppError>;
}

/// Uma transação aberta. Deve terminar com exatamente um `commit` ou `rollback`;
/// se for descartada sem nenhum dos dois, nada é gravado.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Lê os produtos e os protege de escritas concorrentes até o fim da transação.
    /// As linhas são travadas em ordem crescente de id, independente da ordem de
    /// `ids`, para que carrinhos com os mesmos produtos em outra ordem não
    /// entrem em deadlock. Ids repetidos ou inexistentes são ignorados.
    async fn lock_products(&mut self, ids: &[Uuid]) -> Result<Vec<Product>, AppError>;

    /// Baixa condicional do estoque. `None` quando o saldo atual não cobre `quantity`.
    async fn decrement_stock(&mut self, id: Uuid, quantity: i32) -> Result<Option<Product>, AppError>;

    async fn insert_sale(&mut self, sale: &NewSale) -> Result<Sale, AppError>;

    async fn insert_sale_item(
        &mut self,
        sale_id: Uuid,
        position: i32,
        item: &SaleItemDraft,
    ) -> Result<SaleItem, AppError>;

    async fn commit(self) -> Result<(), AppError>;

    async fn rollback(self) -> Result<(), AppError>;
}
