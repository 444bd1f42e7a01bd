//! Router assembly.

use crate::middleware::require_user;
use crate::state::AppState;
use crate::{cart, drugs, users};
use axum::routing::{delete, get, post};
use axum::{middleware, Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// Everything except the health probe sits behind `require_user`. The
/// cart listing route is testing-only and mounted when `debug_routes` is
/// set.
pub fn router(state: AppState, debug_routes: bool) -> Router {
    let mut cart_routes = Router::new()
        .route("/", get(cart::handlers::get_cart))
        .route("/history", get(cart::handlers::get_history))
        .route("/item", post(cart::handlers::add_item))
        .route("/item/{drugId}", delete(cart::handlers::remove_item))
        .route("/purchase", post(cart::handlers::purchase));
    if debug_routes {
        cart_routes = cart_routes.route("/all", get(cart::handlers::list_all));
    }

    let drug_routes = Router::new()
        .route(
            "/",
            get(drugs::handlers::list).post(drugs::handlers::create),
        )
        .route("/forms", get(drugs::handlers::forms))
        .route(
            "/{drugId}",
            get(drugs::handlers::detail)
                .put(drugs::handlers::update)
                .patch(drugs::handlers::update)
                .delete(drugs::handlers::remove),
        );

    let user_routes = Router::new()
        .route(
            "/",
            get(users::handlers::list).post(users::handlers::create),
        )
        .route("/{uid}", delete(users::handlers::remove));

    let authed = Router::new()
        .nest("/cart", cart_routes)
        .nest("/drugs", drug_routes)
        .nest("/users", user_routes)
        .layer(middleware::from_fn_with_state(state.clone(), require_user));

    Router::new()
        .route("/healthz", get(healthz))
        .merge(authed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /healthz` — liveness probe.
async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
