/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::services::auth::{SessionJwt, UserLookup, cookie::CookieOptions};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<SessionJwt>,
    pub users: Arc<dyn UserLookup>,
    pub lookup_timeout: Duration,
    pub cookies: CookieOptions,
}

impl AppState {
    pub fn new(
        db: PgPool,
        tokens: Arc<SessionJwt>,
        users: Arc<dyn UserLookup>,
        lookup_timeout: Duration,
        cookies: CookieOptions,
    ) -> Self {
        Self {
            db,
            tokens,
            users,
            lookup_timeout,
            cookies,
        }
    }
}
