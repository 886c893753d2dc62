/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - cookie/JWT の検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::AuthUser;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// `require_auth` が insert 済みである前提。見つからない場合は配線ミスなので
/// 500 を返す（silent null-dereference にはしない）。
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            tracing::error!("CurrentUser extracted on a route without authentication middleware");
            AppError::Internal
        })
    }
}
