//! Request authentication middleware.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use remedi_commerce::ids::UserId;

/// The authenticated caller, injected into request extensions once the
/// bearer token has been verified upstream.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: UserId,
    pub username: String,
}

/// Reject unauthenticated calls before any handler runs.
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    let claims = state.auth.verify_id_token(token).await?;
    tracing::debug!(uid = %claims.uid, "authenticated request");

    let username = claims
        .username
        .clone()
        .unwrap_or_else(|| claims.uid.to_string());
    request.extensions_mut().insert(AuthUser {
        uid: claims.uid,
        username,
    });

    Ok(next.run(request).await)
}
