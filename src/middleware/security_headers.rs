//! helmet の置き換え: 固定のレスポンスヘッダ一式。
//!
//! Sessions ride on a browser cookie, so every response carries the baseline
//! browser hardening headers. Values are fixed; anything a deployment needs
//! to vary belongs in a reverse proxy, not here. Applied once at the Router
//! level, handlers never set these themselves.

use axum::Router;
use axum::http::header::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

fn header(name: &'static str, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        HeaderName::from_static(name),
        HeaderValue::from_static(value),
    )
}

pub fn apply(router: Router) -> Router {
    router
        // clickjacking (legacy + CSP form)
        .layer(header("x-frame-options", "DENY"))
        .layer(header("content-security-policy", "frame-ancestors 'none'"))
        // MIME sniffing
        .layer(header("x-content-type-options", "nosniff"))
        // referrer leakage
        .layer(header("referrer-policy", "no-referrer"))
        // legacy XSS auditor stays off
        .layer(header("x-xss-protection", "0"))
        // powerful features off by default
        .layer(header(
            "permissions-policy",
            "camera=(), microphone=(), geolocation=()",
        ))
}
