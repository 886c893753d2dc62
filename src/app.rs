/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (CORS / security headers / HTTP stack)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::handler::HandlerWithoutStateExt;
use axum::{Router, ServiceExt, extract::Request};
use sqlx::postgres::PgPoolOptions;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    error,
    middleware::{cors, http, security_headers},
    services::auth::{PgUserLookup, SessionJwt, cookie::CookieOptions},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,storefront_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        // In production, prefer the default behavior (stderr) and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&db).await?;

    let state = build_state(db, &config);
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}

pub fn build_state(db: sqlx::PgPool, config: &Config) -> AppState {
    let tokens = Arc::new(SessionJwt::new(
        &config.jwt_secret,
        config.token_ttl_seconds,
        config.token_leeway_seconds,
    ));
    let users = Arc::new(PgUserLookup::new(db.clone()));
    let cookies = CookieOptions {
        secure: config.app_env.is_production(),
        max_age_seconds: config.token_ttl_seconds,
    };

    AppState::new(db, tokens, users, config.user_lookup_timeout, cookies)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    // Static assets are tried for anything outside the API; a miss lands on the
    // classified 404 fallback, so every unmatched path gets the same error shape.
    let static_files = ServeDir::new(&config.static_dir)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(error::route_fallback.into_service());

    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .fallback_service(static_files)
        .with_state(state);

    let router = cors::apply(router, config);
    security_headers::apply(router)
}

/// The router plus the stateful outer middleware, ready to serve or to drive
/// directly in tests. The rate limiter lives out here so its state spans the
/// whole lifetime of the service, not a single request.
pub fn build_app(state: AppState, config: &Config) -> http::AppService {
    http::apply(build_router(state, config), config)
}
