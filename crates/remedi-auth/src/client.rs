//! Identity provider REST client.
//!
//! Token verification and account management are delegated wholesale to the
//! provider; this client only shuttles requests and maps error codes.

use crate::AuthError;
use remedi_commerce::ids::UserId;
use serde::Deserialize;
use serde_json::json;

/// Claims extracted from a verified ID token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    /// Provider uid of the caller.
    pub uid: UserId,
    /// Display name, when the account has one.
    pub username: Option<String>,
    /// Account email.
    pub email: Option<String>,
}

/// A provider account as returned by signup.
#[derive(Debug, Clone)]
pub struct ProviderAccount {
    pub uid: UserId,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<AccountRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountRecord {
    local_id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the identity provider's account REST API.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    /// Create a client against the provider endpoint.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1/accounts:{}?key={}",
            self.base_url, action, self.api_key
        )
    }

    /// Verify an ID token and return its claims.
    pub async fn verify_id_token(&self, id_token: &str) -> Result<TokenClaims, AuthError> {
        let response = self
            .http
            .post(self.endpoint("lookup"))
            .json(&json!({ "idToken": id_token }))
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::provider_error(response).await;
            tracing::debug!(error = %err, "ID token verification failed");
            return Err(err);
        }

        let lookup: LookupResponse = response.json().await?;
        let account = lookup.users.into_iter().next().ok_or(AuthError::InvalidToken)?;
        Ok(TokenClaims {
            uid: UserId::new(account.local_id),
            username: account.display_name,
            email: account.email,
        })
    }

    /// Create an email/password account.
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderAccount, AuthError> {
        let response = self
            .http
            .post(self.endpoint("signUp"))
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": false,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }

        let created: SignUpResponse = response.json().await?;
        Ok(ProviderAccount {
            uid: UserId::new(created.local_id),
            email: created.email,
        })
    }

    /// Delete the account with the given uid.
    pub async fn delete_account(&self, uid: &UserId) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.endpoint("delete"))
            .json(&json!({ "localId": uid.as_str() }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::provider_error(response).await);
        }
        Ok(())
    }

    async fn provider_error(response: reqwest::Response) -> AuthError {
        match response.json::<ErrorResponse>().await {
            Ok(body) => AuthError::from_provider_code(&body.error.message),
            Err(e) => AuthError::Provider(e.to_string()),
        }
    }
}
