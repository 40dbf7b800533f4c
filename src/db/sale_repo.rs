// src/db/sale_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        catalog::ProductSummary,
        sales::{NewSale, Sale, SaleItem, SaleItemDetail, SaleItemDraft, SaleStatus, SalesStats},
    },
};

// Linha do JOIN sale_items x products
#[derive(Debug, FromRow)]
struct SaleItemRow {
    id: Uuid,
    sale_id: Uuid,
    product_id: Uuid,
    position: i32,
    quantity: i32,
    price: Decimal,
    subtotal: Decimal,
    created_at: DateTime<Utc>,
    product_name: String,
    product_image_url: Option<String>,
}

impl From<SaleItemRow> for SaleItemDetail {
    fn from(row: SaleItemRow) -> Self {
        SaleItemDetail {
            product: ProductSummary {
                id: row.product_id,
                name: row.product_name,
                image_url: row.product_image_url,
            },
            item: SaleItem {
                id: row.id,
                sale_id: row.sale_id,
                product_id: row.product_id,
                position: row.position,
                quantity: row.quantity,
                price: row.price,
                subtotal: row.subtotal,
                created_at: row.created_at,
            },
        }
    }
}

#[derive(Debug, FromRow)]
struct StatsRow {
    total_sales: i64,
    completed_sales: i64,
    pending_sales: i64,
    cancelled_sales: i64,
    total_revenue: Decimal,
}

#[derive(Clone, Default)]
pub struct SaleRepository;

impl SaleRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Escrita (sempre dentro da transação do checkout)
    // ---

    pub async fn insert_sale<'e, E>(&self, executor: E, sale: &NewSale) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (user_id, total, status, shipping_address)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
            .bind(sale.user_id)
            .bind(sale.total)
            .bind(SaleStatus::Pending)
            .bind(&sale.shipping_address)
            .fetch_one(executor)
            .await?;
        Ok(sale)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        position: i32,
        item: &SaleItemDraft,
    ) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, position, quantity, price, subtotal)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(sale_id)
            .bind(item.product.id)
            .bind(position)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.subtotal)
            .fetch_one(executor)
            .await?;
        Ok(item)
    }

    /// Troca o status apenas se a venda ainda estiver em `expected`.
    pub async fn transition_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        expected: SaleStatus,
        next: SaleStatus,
    ) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(expected)
            .bind(next)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    // ---
    // Leitura
    // ---

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn list_by_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE user_id = $1 ORDER BY created_at DESC",
        )
            .bind(user_id)
            .fetch_all(executor)
            .await?;
        Ok(sales)
    }

    pub async fn items_for_sales<'e, E>(
        &self,
        executor: E,
        sale_ids: &[Uuid],
    ) -> Result<Vec<SaleItemDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, SaleItemRow>(
            r#"
            SELECT si.id, si.sale_id, si.product_id, si.position, si.quantity, si.price, si.subtotal, si.created_at,
                   p.name AS product_name, p.image_url AS product_image_url
            FROM sale_items si
            JOIN products p ON p.id = si.product_id
            WHERE si.sale_id = ANY($1)
            ORDER BY si.sale_id, si.position ASC
            "#,
        )
            .bind(sale_ids)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(SaleItemDetail::from).collect())
    }

    pub async fn stats<'e, E>(&self, executor: E) -> Result<SalesStats, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COUNT(*)                                          AS total_sales,
                COUNT(*) FILTER (WHERE status = 'completed')      AS completed_sales,
                COUNT(*) FILTER (WHERE status = 'pending')        AS pending_sales,
                COUNT(*) FILTER (WHERE status = 'cancelled')      AS cancelled_sales,
                COALESCE(SUM(total) FILTER (WHERE status = 'completed'), 0) AS total_revenue
            FROM sales
            "#,
        )
            .fetch_one(executor)
            .await?;

        Ok(SalesStats {
            total_sales: row.total_sales,
            completed_sales: row.completed_sales,
            pending_sales: row.pending_sales,
            cancelled_sales: row.cancelled_sales,
            total_revenue: row.total_revenue,
        })
    }
}
