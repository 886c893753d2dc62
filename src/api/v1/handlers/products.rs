/*
 * Responsibility
 * - /products 系 CRUD handler (read は public、write は admin)
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::dto::products::{CreateProductRequest, ProductResponse, UpdateProductRequest},
    error::AppError,
    repos::product_repo,
    state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let rows = product_repo::list(&state.db).await?;
    let res = rows.into_iter().map(ProductResponse::from).collect();

    Ok(Json(res))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let row = product_repo::get(&state.db, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("product"))?;

    Ok(Json(ProductResponse::from(row)))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let row = product_repo::create(
        &state.db,
        req.name.trim(),
        req.description.as_deref(),
        req.price_cents,
        req.stock,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(row))))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let row = product_repo::update(
        &state.db,
        product_id,
        req.name.as_deref(),
        req.description.as_deref(),
        req.price_cents,
        req.stock,
    )
    .await?
    .ok_or_else(|| AppError::not_found("product"))?;

    Ok(Json(ProductResponse::from(row)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = product_repo::delete(&state.db, product_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("product"))
    }
}
