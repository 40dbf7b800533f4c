// src/services/catalog_service.rs

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::store::CatalogStore,
    models::{
        auth::User,
        catalog::{CreateProductPayload, Product, UpdateProductPayload},
    },
};

#[derive(Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S: CatalogStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, AppError> {
        self.store
            .get_product(id)
            .await?
            .ok_or(AppError::ProductNotFound { product_id: id })
    }

    pub async fn create_product(
        &self,
        created_by: Uuid,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError> {
        payload.validate()?;

        let product = self.store.create_product(created_by, payload).await?;
        tracing::info!(product_id = %product.id, "✅ Produto criado: {}", product.name);
        Ok(product)
    }

    // Edição parcial: admin edita qualquer produto, editor só os próprios
    pub async fn update_product(
        &self,
        id: Uuid,
        changes: &UpdateProductPayload,
        editor: &User,
    ) -> Result<Product, AppError> {
        changes.validate()?;
        self.ensure_can_edit(id, editor).await?;

        let product = self
            .store
            .update_product(id, changes)
            .await?
            .ok_or(AppError::ProductNotFound { product_id: id })?;
        tracing::info!(product_id = %id, user_id = %editor.id, "✏️ Produto atualizado");
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid, editor: &User) -> Result<(), AppError> {
        self.ensure_can_edit(id, editor).await?;

        if !self.store.delete_product(id).await? {
            return Err(AppError::ProductNotFound { product_id: id });
        }
        tracing::info!(product_id = %id, user_id = %editor.id, "🗑️ Produto removido");
        Ok(())
    }

    async fn ensure_can_edit(&self, id: Uuid, editor: &User) -> Result<(), AppError> {
        let product = self.get_product(id).await?;
        if !editor.can_edit_product(&product) {
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::memory_store::MemoryStore, models::auth::UserRole};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "equipe@loja.com".into(),
            password_hash: String::new(),
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            phone: None,
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payload(name: &str, price: Decimal, stock: i32) -> CreateProductPayload {
        CreateProductPayload {
            name: name.into(),
            description: None,
            price,
            stock,
            image_url: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn creates_and_reads_back_a_product() {
        let service = CatalogService::new(MemoryStore::new());
        let admin_id = Uuid::new_v4();

        let created = service
            .create_product(admin_id, &payload("  Moedor  ", Decimal::new(4990, 2), 4))
            .await
            .unwrap();

        assert_eq!(created.name, "Moedor");
        assert_eq!(created.created_by, admin_id);

        let fetched = service.get_product(created.id).await.unwrap();
        assert_eq!(fetched.stock, 4);
        assert_eq!(fetched.price, Decimal::new(4990, 2));
    }

    #[tokio::test]
    async fn rejects_negative_price_and_stock() {
        let service = CatalogService::new(MemoryStore::new());

        let err = service
            .create_product(Uuid::new_v4(), &payload("Moedor", Decimal::new(-1, 0), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service
            .create_product(Uuid::new_v4(), &payload("Moedor", Decimal::ONE, -3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn partial_update_only_touches_given_fields() {
        let service = CatalogService::new(MemoryStore::new());
        let created = service
            .create_product(Uuid::new_v4(), &payload("Moedor", Decimal::new(4990, 2), 4))
            .await
            .unwrap();

        let changes = UpdateProductPayload { is_active: Some(false), stock: Some(10), ..Default::default() };
        let updated = service
            .update_product(created.id, &changes, &user(UserRole::Admin))
            .await
            .unwrap();

        assert!(!updated.is_active);
        assert_eq!(updated.stock, 10);
        assert_eq!(updated.name, "Moedor");
        assert_eq!(updated.price, Decimal::new(4990, 2));
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let service = CatalogService::new(MemoryStore::new());
        let id = Uuid::new_v4();

        assert!(matches!(service.get_product(id).await, Err(AppError::ProductNotFound { product_id }) if product_id == id));
        assert!(matches!(
            service.update_product(id, &UpdateProductPayload::default(), &user(UserRole::Admin)).await,
            Err(AppError::ProductNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn rejects_price_that_does_not_fit_the_money_column() {
        let service = CatalogService::new(MemoryStore::new());

        let err = service
            .create_product(Uuid::new_v4(), &payload("Moedor", Decimal::new(100_000_000, 0), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn editor_changes_only_own_products() {
        let service = CatalogService::new(MemoryStore::new());
        let editor = user(UserRole::Editor);
        let other_editor = user(UserRole::Editor);

        let own = service
            .create_product(editor.id, &payload("Moedor", Decimal::ONE, 1))
            .await
            .unwrap();
        let changes = UpdateProductPayload { stock: Some(9), ..Default::default() };

        assert_eq!(service.update_product(own.id, &changes, &editor).await.unwrap().stock, 9);
        assert!(matches!(
            service.update_product(own.id, &changes, &other_editor).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(service.delete_product(own.id, &other_editor).await, Err(AppError::Forbidden)));
        assert!(matches!(
            service.update_product(own.id, &changes, &user(UserRole::Customer)).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn admin_deletes_any_product() {
        let service = CatalogService::new(MemoryStore::new());
        let created = service
            .create_product(Uuid::new_v4(), &payload("Moedor", Decimal::ONE, 1))
            .await
            .unwrap();
        let admin = user(UserRole::Admin);

        service.delete_product(created.id, &admin).await.unwrap();

        assert!(matches!(service.get_product(created.id).await, Err(AppError::ProductNotFound { .. })));
        assert!(matches!(
            service.delete_product(created.id, &admin).await,
            Err(AppError::ProductNotFound { .. })
        ));
    }
}
