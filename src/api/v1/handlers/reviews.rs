/*
 * Responsibility
 * - /products/{id}/reviews と /reviews/{id} handler
 * - 削除は投稿者本人か admin のみ
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::dto::reviews::{CreateReviewRequest, ReviewResponse},
    api::v1::extractors::CurrentUser,
    error::AppError,
    repos::error::RepoError,
    repos::{product_repo, review_repo},
    services::auth::Role,
    state::AppState,
};

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    // 404 for a product that does not exist, [] for one with no reviews.
    product_repo::get(&state.db, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("product"))?;

    let rows = review_repo::list_for_product(&state.db, product_id).await?;
    let res = rows.into_iter().map(ReviewResponse::from).collect();

    Ok(Json(res))
}

pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    product_repo::get(&state.db, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("product"))?;

    let row = review_repo::create(
        &state.db,
        product_id,
        user.id,
        req.rating,
        req.comment.as_deref(),
    )
    .await
    .map_err(|e| match e {
        RepoError::Conflict => {
            AppError::conflict("ALREADY_REVIEWED", "you have already reviewed this product")
        }
        other => AppError::from(other),
    })?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(row))))
}

pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(review_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let review = review_repo::get(&state.db, review_id)
        .await?
        .ok_or_else(|| AppError::not_found("review"))?;

    if review.user_id != user.id && user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let deleted = review_repo::delete(&state.db, review_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("review"))
    }
}
