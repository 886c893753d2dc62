/*
 * Responsibility
 * - /users 系 handler (signup/login/logout/me + admin 管理)
 * - Json を extractor で受け、DTO validation → repo/service 呼び出し
 * - 失敗はすべて AppError 経由で終端ハンドラへ
 */
use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{AppendHeaders, IntoResponse},
};
use uuid::Uuid;

use crate::{
    api::v1::dto::users::{LoginRequest, SignupRequest, UpdateMeRequest, UserResponse},
    api::v1::extractors::CurrentUser,
    error::AppError,
    repos::error::RepoError,
    repos::user_repo,
    services::auth::{Role, cookie, password},
    state::AppState,
};

fn row_to_response(row: user_repo::UserRow) -> Result<UserResponse, AppError> {
    // A role we cannot parse is corrupt data, not a client error.
    let role = Role::from_str(&row.role).map_err(|_| {
        tracing::error!(user_id = %row.id, role = %row.role, "unknown role in users table");
        AppError::Internal
    })?;

    Ok(UserResponse {
        id: row.id,
        name: row.name,
        email: row.email,
        role,
    })
}

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let password_hash = password::hash(&req.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        AppError::Internal
    })?;

    let email = req.email.trim().to_ascii_lowercase();
    let row = user_repo::create(
        &state.db,
        &email,
        req.name.trim(),
        &password_hash,
        Role::Customer.as_str(),
    )
    .await
    .map_err(|e| match e {
        RepoError::Conflict => AppError::conflict("EMAIL_TAKEN", "email is already registered"),
        other => AppError::from(other),
    })?;

    // Sign the new account in right away, same as login.
    let token = state.tokens.sign(row.id).map_err(|e| {
        tracing::error!(error = %e, "failed to sign session token");
        AppError::Internal
    })?;
    let set_cookie = cookie::session_cookie(&token, state.cookies);

    let body = row_to_response(row)?;
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::SET_COOKIE, set_cookie)]),
        Json(body),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let email = req.email.trim().to_ascii_lowercase();
    let row = user_repo::find_by_email(&state.db, &email).await?;

    // Same rejection for unknown email and wrong password.
    let row = row.ok_or_else(|| AppError::unauthorized("Incorrect email or password"))?;
    if !password::verify(&req.password, &row.password_hash) {
        return Err(AppError::unauthorized("Incorrect email or password"));
    }

    let token = state.tokens.sign(row.id).map_err(|e| {
        tracing::error!(error = %e, "failed to sign session token");
        AppError::Internal
    })?;
    let set_cookie = cookie::session_cookie(&token, state.cookies);

    let body = row_to_response(user_repo::UserRow {
        id: row.id,
        email: row.email,
        name: row.name,
        role: row.role,
    })?;
    Ok((
        StatusCode::OK,
        AppendHeaders([(header::SET_COOKIE, set_cookie)]),
        Json(body),
    ))
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let clear = cookie::clear_session_cookie(state.cookies);
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(header::SET_COOKIE, clear)]),
    )
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("VALIDATION", msg))?;

    let row = match req.name {
        Some(name) => user_repo::update_name(&state.db, user.id, name.trim())
            .await?
            .ok_or_else(|| AppError::not_found("user"))?,
        None => user_repo::get(&state.db, user.id)
            .await?
            .ok_or_else(|| AppError::not_found("user"))?,
    };

    Ok(Json(row_to_response(row)?))
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list(&state.db).await?;
    let res = rows
        .into_iter()
        .map(row_to_response)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(res))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = user_repo::delete(&state.db, user_id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}
