//! Identity provider access through the Firebase Identity Toolkit REST API.
//!
//! The provider owns credentials entirely: this service only verifies ID
//! tokens, asks for password-reset mails, changes a caller's email address and
//! removes an account when registration has to be rolled back.

use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::debug;

use crate::{config::Config, models::user::RequesterIdentity};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("Identity provider rejected the request: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_id_token(&self, id_token: &str) -> Result<RequesterIdentity, IdentityError>;

    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError>;

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;

    async fn update_email(&self, id_token: &str, new_email: &str) -> Result<(), IdentityError>;
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct Ignored {}

pub struct FirebaseIdentity {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl FirebaseIdentity {
    pub fn new(config: &Config) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.identity_api_url.trim_end_matches('/').to_string(),
            api_key: config.firebase_api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<T, IdentityError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| IdentityError::Config("FIREBASE_API_KEY".to_string()))?;

        debug!(action, "calling identity provider");
        let response = self
            .client
            .post(format!("{}/v1/accounts:{}", self.base_url, action))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<ErrorEnvelope>().await {
                Ok(envelope) => envelope.error.message,
                Err(_) => format!("status {}", status.as_u16()),
            };
            return Err(IdentityError::Rejected(message));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn verify_id_token(&self, id_token: &str) -> Result<RequesterIdentity, IdentityError> {
        let lookup: LookupResponse = self
            .call("lookup", json!({ "idToken": id_token }))
            .await?;

        let user = lookup
            .users
            .into_iter()
            .next()
            .ok_or_else(|| IdentityError::Rejected("USER_NOT_FOUND".to_string()))?;

        Ok(RequesterIdentity {
            uid: user.local_id,
            email: user.email,
            id_token: id_token.to_string(),
        })
    }

    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError> {
        let _: Ignored = self
            .call("delete", json!({ "idToken": id_token }))
            .await?;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let _: Ignored = self
            .call(
                "sendOobCode",
                json!({ "requestType": "PASSWORD_RESET", "email": email }),
            )
            .await?;
        Ok(())
    }

    async fn update_email(&self, id_token: &str, new_email: &str) -> Result<(), IdentityError> {
        let _: Ignored = self
            .call(
                "update",
                json!({ "idToken": id_token, "email": new_email, "returnSecureToken": false }),
            )
            .await?;
        Ok(())
    }
}
