/*
 * Responsibility
 * - products テーブル向け SQLx 操作
 * - 価格は最小通貨単位 (cents) の整数で持つ
 */
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct ProductRow {
    #[sqlx(rename = "productId")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(rename = "priceCents")]
    pub price_cents: i64,
    pub stock: i32,
}

pub async fn list(db: &PgPool) -> Result<Vec<ProductRow>, RepoError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT "productId", name, description, "priceCents", stock
        FROM products
        ORDER BY "createdAt" DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, product_id: Uuid) -> Result<Option<ProductRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        SELECT "productId", name, description, "priceCents", stock
        FROM products
        WHERE "productId" = $1
        "#,
    )
    .bind(product_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn create(
    db: &PgPool,
    name: &str,
    description: Option<&str>,
    price_cents: i64,
    stock: i32,
) -> Result<ProductRow, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        INSERT INTO products (name, description, "priceCents", stock)
        VALUES ($1, $2, $3, $4)
        RETURNING "productId", name, description, "priceCents", stock
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(stock)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    product_id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    price_cents: Option<i64>,
    stock: Option<i32>,
) -> Result<Option<ProductRow>, RepoError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r#"
        UPDATE products
        SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            "priceCents" = COALESCE($4, "priceCents"),
            stock = COALESCE($5, stock)
        WHERE "productId" = $1
        RETURNING "productId", name, description, "priceCents", stock
        "#,
    )
    .bind(product_id)
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(stock)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, product_id: Uuid) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM products
        WHERE "productId" = $1
        "#,
    )
    .bind(product_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
