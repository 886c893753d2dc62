/*
 * Responsibility
 * - /carts/me 系 handler — カートは常に認証済みユーザー自身のもの
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::dto::carts::{AddCartItemRequest, CartResponse},
    api::v1::extractors::CurrentUser,
    error::AppError,
    repos::cart_repo,
    state::AppState,
};

pub async fn get_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<CartResponse>, AppError> {
    let rows = cart_repo::items_for_user(&state.db, user.id).await?;
    Ok(Json(CartResponse::from_rows(rows)))
}

pub async fn add_cart_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<AddCartItemRequest>,
) -> Result<(StatusCode, Json<CartResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let added = cart_repo::upsert_item(&state.db, user.id, req.product_id, req.quantity).await?;
    if !added {
        return Err(AppError::not_found("product"));
    }

    let rows = cart_repo::items_for_user(&state.db, user.id).await?;
    Ok((StatusCode::CREATED, Json(CartResponse::from_rows(rows))))
}

pub async fn remove_cart_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> Result<Json<CartResponse>, AppError> {
    let removed = cart_repo::remove_item(&state.db, user.id, product_id).await?;
    if !removed {
        return Err(AppError::not_found("cart item"));
    }

    let rows = cart_repo::items_for_user(&state.db, user.id).await?;
    Ok(Json(CartResponse::from_rows(rows)))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, AppError> {
    cart_repo::clear(&state.db, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
