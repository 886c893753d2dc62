//! セッション cookie（JWT）検証 → CurrentUser を extensions に入れる
//!
//! Per request, the protected path walks:
//! cookie present → token verified → identity resolved → (role checked) → handler.
//! Any failed step short-circuits with a classified error; the terminal handler
//! in `error.rs` writes the response.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::CurrentUser;
use crate::error::AppError;
use crate::services::auth::{Role, cookie};
use crate::state::AppState;

/// Authentication middleware for protected routes.
///
/// Apply per route group via `route_layer`:
/// ```ignore
/// .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = cookie::session_token(req.headers())
        .ok_or_else(|| AppError::unauthorized("Sign in before trying to access this route"))?;

    // Signature + exp + sub checks live in SessionJwt; failure here is
    // terminal and must not reach the user lookup.
    let session = match state.tokens.verify(&token) {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(error = ?err, "session token verification failed");
            return Err(AppError::unauthorized("Token verification failed"));
        }
    };

    let lookup = state.users.find_by_id(session.user_id);
    let user = match tokio::time::timeout(state.lookup_timeout, lookup).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(user_id = %session.user_id, "user lookup timed out");
            return Err(AppError::LookupTimeout);
        }
    };

    // A valid token for a deleted account is not an identity.
    let user = user.ok_or_else(|| AppError::unauthorized("This account no longer exists"))?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Role check for routes registered with a fixed required role.
///
/// Wire with a closure so the role is fixed at registration time:
/// ```ignore
/// .route_layer(middleware::from_fn(move |req, next| check_role(Role::Admin, req, next)))
/// ```
///
/// Assumes `require_auth` ran first; if it did not, this is a wiring bug and
/// the request fails fast with a masked 500 instead of proceeding.
pub async fn check_role(
    required: Role,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(CurrentUser(user)) = req.extensions().get::<CurrentUser>() else {
        tracing::error!("role check ran without authentication middleware");
        return Err(AppError::Internal);
    };

    if user.role != required {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
