/*
 * Responsibility
 * - cart_items テーブル向け SQLx 操作 (user ごとのカート)
 * - 商品の存在確認は INSERT ... SELECT で同一文内に畳み込む
 */
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct CartItemRow {
    #[sqlx(rename = "productId")]
    pub product_id: Uuid,
    pub name: String,
    #[sqlx(rename = "priceCents")]
    pub price_cents: i64,
    pub quantity: i32,
}

pub async fn items_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<CartItemRow>, RepoError> {
    let rows = sqlx::query_as::<_, CartItemRow>(
        r#"
        SELECT c."productId", p.name, p."priceCents", c.quantity
        FROM cart_items c
        JOIN products p ON p."productId" = c."productId"
        WHERE c."userId" = $1
        ORDER BY c."createdAt"
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Add `quantity` of a product to the user's cart, accumulating on repeat.
///
/// Returns false when the product does not exist (nothing inserted).
pub async fn upsert_item(
    db: &PgPool,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        INSERT INTO cart_items ("userId", "productId", quantity)
        SELECT $1, "productId", $3 FROM products WHERE "productId" = $2
        ON CONFLICT ("userId", "productId")
        DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn remove_item(
    db: &PgPool,
    user_id: Uuid,
    product_id: Uuid,
) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM cart_items
        WHERE "userId" = $1 AND "productId" = $2
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn clear(db: &PgPool, user_id: Uuid) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        DELETE FROM cart_items
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(())
}
