//! Cart HTTP handlers.
//!
//! Thin wrappers: extract the authenticated caller and the request input,
//! delegate to the workflow, map the outcome to a response.

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use remedi_commerce::cart::Cart;
use serde::Deserialize;
use serde_json::json;

/// Body of `POST /cart/item`.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(rename = "drugId")]
    pub drug_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// `GET /cart` — fetch-or-create the caller's open cart.
pub async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.workflow.open_cart(&user.uid).await?))
}

/// `GET /cart/history` — the caller's purchased carts.
pub async fn get_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let carts = state.workflow.history(&user.uid).await?;
    if carts.is_empty() {
        return Ok(Json(json!({ "message": "The user didn't make any purchase" })).into_response());
    }
    Ok(Json(carts).into_response())
}

/// `POST /cart/item` — add a drug to the open cart.
pub async fn add_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(
        state
            .workflow
            .add_item(&user.uid, &body.drug_id, body.quantity)
            .await?,
    ))
}

/// `DELETE /cart/item/{drugId}` — remove a drug from the open cart.
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(drug_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.workflow.remove_item(&user.uid, &drug_id).await?;
    Ok(Json(json!({ "message": "Item deleted" })))
}

/// `POST /cart/purchase` — finalize the open cart.
pub async fn purchase(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(
        state.workflow.purchase(&user.uid, &user.username).await?,
    ))
}

/// `GET /cart/all` — every cart in the store. Testing only; mounted behind
/// the debug-routes flag.
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Cart>>, ApiError> {
    Ok(Json(state.workflow.list_all().await?))
}
