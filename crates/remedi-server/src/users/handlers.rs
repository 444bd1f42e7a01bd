//! User account HTTP handlers.
//!
//! Credentials are held by the identity provider; these handlers call it
//! first, then keep the directory record in the document store in step.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use remedi_commerce::ids::UserId;
use remedi_commerce::user::User;
use serde::Deserialize;
use serde_json::json;

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// `POST /users` — create a provider account and its directory record.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let account = state
        .auth
        .create_account(&body.email, &body.password)
        .await?;
    let username = body.username.unwrap_or_else(|| account.email.clone());
    let user = User::new(account.uid, username, account.email);
    state.users.insert(user.clone()).await?;
    Ok(Json(json!({ "user": user })))
}

/// `DELETE /users/{uid}` — delete the provider account and the record.
pub async fn remove(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let uid = UserId::new(uid);
    state.auth.delete_account(&uid).await?;
    state.users.delete(&uid).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}

/// `GET /users` — all directory records.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list().await?))
}
