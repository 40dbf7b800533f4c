// src/db/product_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{CreateProductPayload, Product, UpdateProductPayload},
};

// Sem estado: todas as funções recebem o executor (pool ou transação).
#[derive(Clone, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Lê e trava as linhas até o fim da transação, sempre em ordem de id.
    /// Só faz sentido dentro de uma transação (`&mut *tx`).
    pub async fn lock_for_update<'e, E>(
        &self,
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        // O ORDER BY é aplicado antes do FOR UPDATE: os locks seguem a ordem do id
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
            .bind(ids.as_slice())
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        created_by: Uuid,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, stock, image_url, is_active, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(payload.name.trim())
            .bind(payload.description.as_deref())
            .bind(payload.price)
            .bind(payload.stock)
            .bind(payload.image_url.as_deref())
            .bind(payload.is_active)
            .bind(created_by)
            .fetch_one(executor)
            .await?;
        Ok(product)
    }

    /// Atualização parcial em uma única instrução (COALESCE mantém o valor atual).
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        changes: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                price       = COALESCE($4, price),
                stock       = COALESCE($5, stock),
                image_url   = COALESCE($6, image_url),
                is_active   = COALESCE($7, is_active),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(changes.name.as_deref().map(str::trim))
            .bind(changes.description.as_deref())
            .bind(changes.price)
            .bind(changes.stock)
            .bind(changes.image_url.as_deref())
            .bind(changes.is_active)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Remove o produto. A FK de `sale_items` impede apagar produtos já vendidos.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_foreign_key_violation() => {
                    AppError::ProductHasSales { product_id: id }
                }
                _ => e.into(),
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Baixa condicional: só altera a linha se ainda houver saldo.
    /// Retorna `None` quando o saldo não cobre `quantity`.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND stock >= $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(quantity)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }
}
