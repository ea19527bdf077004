use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::Config,
    consts::invite_const::INVITE_TOKEN_TTL_SECS,
    errors::{Error, Result},
    models::{invitation::InvitationClaims, user::EntityId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InviteTokenError {
    #[error("Invalid invite token")]
    Malformed,
    #[error("Invite token expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvitePayload {
    organization_id: EntityId,
    role_id: EntityId,
    inviter: EntityId,
    time: i64,
    iat: i64,
    exp: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signs and verifies invitation tokens (HS256 JWTs valid for one hour).
#[derive(Clone)]
pub struct InviteCodec {
    keys: Option<Arc<Keys>>,
}

impl InviteCodec {
    /// An absent or empty secret yields a codec that refuses to sign or verify.
    pub fn new(secret: Option<&str>) -> Self {
        let keys = secret.filter(|s| !s.is_empty()).map(|secret| {
            Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            })
        });
        Self { keys }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.invite_secret.as_deref())
    }

    fn keys(&self) -> Result<&Keys> {
        self.keys
            .as_deref()
            .ok_or_else(|| Error::Configuration("INVITE_SECRET".to_string()))
    }

    pub fn mint(&self, claims: &InvitationClaims) -> Result<String> {
        self.mint_at(claims, Utc::now())
    }

    pub fn mint_at(&self, claims: &InvitationClaims, now: DateTime<Utc>) -> Result<String> {
        let keys = self.keys()?;
        let payload = InvitePayload {
            organization_id: claims.organization_id().clone(),
            role_id: claims.role_id().clone(),
            inviter: claims.inviter().clone(),
            time: claims.issued_at_time().timestamp_millis(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(INVITE_TOKEN_TTL_SECS)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &payload, &keys.encoding)?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<InvitationClaims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<InvitationClaims> {
        let keys = self.keys()?;

        // expiry is checked below against `now`, with no leeway
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let payload = decode::<InvitePayload>(token.trim(), &keys.decoding, &validation)
            .map_err(|err| {
                debug!("invite token rejected: {}", err);
                InviteTokenError::Malformed
            })?
            .claims;

        if now.timestamp() >= payload.exp {
            return Err(InviteTokenError::Expired.into());
        }

        let issued_at =
            DateTime::from_timestamp_millis(payload.time).ok_or(InviteTokenError::Malformed)?;
        Ok(InvitationClaims::issued_at(
            payload.organization_id,
            payload.role_id,
            payload.inviter,
            issued_at,
        ))
    }
}
