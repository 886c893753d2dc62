/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /users, /products, /carts, /reviews を route
 * - 認証・認可が必要な範囲は route_layer でここで決める
 *   (authenticate → role check の合成は登録時に固定し、順序ミスを構造で防ぐ)
 */
use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;

use crate::api::v1::handlers::{
    carts::{add_cart_item, clear_cart, get_cart, remove_cart_item},
    health::health,
    products::{create_product, delete_product, get_product, list_products, update_product},
    reviews::{create_review, delete_review, list_reviews},
    users::{delete_user, list_users, login, logout, me, signup, update_me},
};
use crate::middleware::auth::session::{check_role, require_auth};
use crate::services::auth::Role;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    // Authentication only.
    let authed = ServiceBuilder::new().layer(middleware::from_fn_with_state(
        state.clone(),
        require_auth,
    ));

    // Authentication, then the admin role check. The composition is fixed here
    // so the role check can never run against an unidentified request.
    let admin = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(state, require_auth))
        .layer(middleware::from_fn(
            move |req: Request<Body>, next: Next| check_role(Role::Admin, req, next),
        ));

    Router::new()
        .route("/health", get(health))
        // users
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .route("/users/logout", post(logout).route_layer(authed.clone()))
        .route(
            "/users/me",
            get(me).patch(update_me).route_layer(authed.clone()),
        )
        .route("/users", get(list_users).route_layer(admin.clone()))
        .route(
            "/users/{user_id}",
            delete(delete_user).route_layer(admin.clone()),
        )
        // products: reads are public, writes are admin-only
        .route(
            "/products",
            get(list_products).merge(post(create_product).route_layer(admin.clone())),
        )
        .route(
            "/products/{product_id}",
            get(get_product).merge(
                axum::routing::put(update_product)
                    .delete(delete_product)
                    .route_layer(admin),
            ),
        )
        // reviews: reads are public, writes need a signed-in user
        .route(
            "/products/{product_id}/reviews",
            get(list_reviews).merge(post(create_review).route_layer(authed.clone())),
        )
        .route(
            "/reviews/{review_id}",
            delete(delete_review).route_layer(authed.clone()),
        )
        // carts: always scoped to the authenticated user
        .route(
            "/carts/me",
            get(get_cart).delete(clear_cart).route_layer(authed.clone()),
        )
        .route(
            "/carts/me/items",
            post(add_cart_item).route_layer(authed.clone()),
        )
        .route(
            "/carts/me/items/{product_id}",
            delete(remove_cart_item).route_layer(authed),
        )
}
