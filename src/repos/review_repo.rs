/*
 * Responsibility
 * - reviews テーブル向け SQLx 操作
 * - (userId, productId) は一意 — 一人一レビュー
 */
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct ReviewRow {
    #[sqlx(rename = "reviewId")]
    pub id: Uuid,
    #[sqlx(rename = "productId")]
    pub product_id: Uuid,
    #[sqlx(rename = "userId")]
    pub user_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

pub async fn list_for_product(
    db: &PgPool,
    product_id: Uuid,
) -> Result<Vec<ReviewRow>, RepoError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT "reviewId", "productId", "userId", rating, comment
        FROM reviews
        WHERE "productId" = $1
        ORDER BY "createdAt" DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    product_id: Uuid,
    user_id: Uuid,
    rating: i16,
    comment: Option<&str>,
) -> Result<ReviewRow, RepoError> {
    let row = sqlx::query_as::<_, ReviewRow>(
        r#"
        INSERT INTO reviews ("productId", "userId", rating, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING "reviewId", "productId", "userId", rating, comment
        "#,
    )
    .bind(product_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn get(db: &PgPool, review_id: Uuid) -> Result<Option<ReviewRow>, RepoError> {
    let row = sqlx::query_as::<_, ReviewRow>(
        r#"
        SELECT "reviewId", "productId", "userId", rating, comment
        FROM reviews
        WHERE "reviewId" = $1
        "#,
    )
    .bind(review_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, review_id: Uuid) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM reviews
        WHERE "reviewId" = $1
        "#,
    )
    .bind(review_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
