// src/services/wishlist_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CatalogStore, WishlistStore},
    models::wishlist::WishlistEntry,
};

#[derive(Clone)]
pub struct WishlistService<S> {
    store: S,
}

impl<S> WishlistService<S>
where
    S: CatalogStore + WishlistStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, AppError> {
        self.store.list_wishlist(user_id).await
    }

    pub async fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistEntry, AppError> {
        let product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or(AppError::ProductNotFound { product_id })?;

        let item = self.store.add_to_wishlist(user_id, product_id).await?;
        Ok(WishlistEntry { item, product })
    }

    pub async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<(), AppError> {
        if !self.store.remove_from_wishlist(user_id, product_id).await? {
            return Err(AppError::WishlistItemNotFound { product_id });
        }
        Ok(())
    }

    pub async fn clear(&self, user_id: Uuid) -> Result<(), AppError> {
        let removed = self.store.clear_wishlist(user_id).await?;
        tracing::debug!(%user_id, removed, "Lista de desejos esvaziada");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store::MemoryStore;
    use rust_decimal::Decimal;

    fn service() -> (WishlistService<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (WishlistService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn adds_products_and_lists_newest_first() {
        let (service, store) = service();
        let a = store.seed_product("A", Decimal::ONE, 1, true).await;
        let b = store.seed_product("B", Decimal::ONE, 1, true).await;
        let user_id = Uuid::new_v4();

        let added = service.add(user_id, a.id).await.unwrap();
        assert_eq!(added.product.id, a.id);
        service.add(user_id, b.id).await.unwrap();
        service.add(Uuid::new_v4(), a.id).await.unwrap();

        let mine = service.list(user_id).await.unwrap();
        assert_eq!(mine.iter().map(|e| e.product.id).collect::<Vec<_>>(), vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn same_product_cannot_be_added_twice() {
        let (service, store) = service();
        let a = store.seed_product("A", Decimal::ONE, 1, true).await;
        let user_id = Uuid::new_v4();

        service.add(user_id, a.id).await.unwrap();
        assert!(matches!(
            service.add(user_id, a.id).await,
            Err(AppError::AlreadyInWishlist { product_id }) if product_id == a.id
        ));
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (service, _) = service();
        let missing = Uuid::new_v4();

        assert!(matches!(
            service.add(Uuid::new_v4(), missing).await,
            Err(AppError::ProductNotFound { product_id }) if product_id == missing
        ));
    }

    #[tokio::test]
    async fn remove_and_clear_only_touch_the_callers_list() {
        let (service, store) = service();
        let a = store.seed_product("A", Decimal::ONE, 1, true).await;
        let b = store.seed_product("B", Decimal::ONE, 1, true).await;
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        service.add(me, a.id).await.unwrap();
        service.add(me, b.id).await.unwrap();
        service.add(other, a.id).await.unwrap();

        service.remove(me, a.id).await.unwrap();
        assert!(matches!(service.remove(me, a.id).await, Err(AppError::WishlistItemNotFound { .. })));
        assert_eq!(service.list(me).await.unwrap().len(), 1);

        service.clear(me).await.unwrap();
        assert!(service.list(me).await.unwrap().is_empty());
        assert_eq!(service.list(other).await.unwrap().len(), 1);
    }
}
