// src/db/wishlist_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        catalog::Product,
        wishlist::{WishlistEntry, WishlistItem},
    },
};

// Linha do JOIN wishlists x products
#[derive(Debug, FromRow)]
struct WishlistRow {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    created_at: DateTime<Utc>,
    product_name: String,
    product_description: Option<String>,
    product_price: Decimal,
    product_stock: i32,
    product_image_url: Option<String>,
    product_is_active: bool,
    product_created_by: Uuid,
    product_created_at: DateTime<Utc>,
    product_updated_at: DateTime<Utc>,
}

impl From<WishlistRow> for WishlistEntry {
    fn from(row: WishlistRow) -> Self {
        WishlistEntry {
            item: WishlistItem {
                id: row.id,
                user_id: row.user_id,
                product_id: row.product_id,
                created_at: row.created_at,
            },
            product: Product {
                id: row.product_id,
                name: row.product_name,
                description: row.product_description,
                price: row.product_price,
                stock: row.product_stock,
                image_url: row.product_image_url,
                is_active: row.product_is_active,
                created_by: row.product_created_by,
                created_at: row.product_created_at,
                updated_at: row.product_updated_at,
            },
        }
    }
}

#[derive(Clone, Default)]
pub struct WishlistRepository;

impl WishlistRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_by_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<Vec<WishlistEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, WishlistRow>(
            r#"
            SELECT
                w.id, w.user_id, w.product_id, w.created_at,
                p.name        AS product_name,
                p.description AS product_description,
                p.price       AS product_price,
                p.stock       AS product_stock,
                p.image_url   AS product_image_url,
                p.is_active   AS product_is_active,
                p.created_by  AS product_created_by,
                p.created_at  AS product_created_at,
                p.updated_at  AS product_updated_at
            FROM wishlists w
            JOIN products p ON p.id = w.product_id
            WHERE w.user_id = $1
            ORDER BY w.created_at DESC
            "#,
        )
            .bind(user_id)
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(WishlistEntry::from).collect())
    }

    pub async fn insert<'e, E>(&self, executor: E, user_id: Uuid, product_id: Uuid) -> Result<WishlistItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, WishlistItem>(
            r#"
            INSERT INTO wishlists (user_id, product_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
            .bind(user_id)
            .bind(product_id)
            .fetch_one(executor)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => AppError::AlreadyInWishlist { product_id },
                // Produto removido entre a checagem e o INSERT
                Some(db_err) if db_err.is_foreign_key_violation() => AppError::ProductNotFound { product_id },
                _ => e.into(),
            })
    }

    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, product_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM wishlists WHERE user_id = $1 AND product_id = $2")
            .bind(user_id)
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear<'e, E>(&self, executor: E, user_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM wishlists WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
