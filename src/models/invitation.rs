use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::EntityId;

/// Payload carried inside an invitation token.
///
/// Fields are private: once built, claims are only ever read, so the codec
/// always signs exactly what was constructed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvitationClaims {
    organization_id: EntityId,
    role_id: EntityId,
    inviter: EntityId,
    #[serde(rename = "time", with = "chrono::serde::ts_milliseconds")]
    issued_at: DateTime<Utc>,
}

impl InvitationClaims {
    /// Stamps the claims with the current time.
    pub fn new(organization_id: EntityId, role_id: EntityId, inviter: EntityId) -> Self {
        Self::issued_at(organization_id, role_id, inviter, Utc::now())
    }

    /// Millisecond precision matches what survives the token encoding.
    pub fn issued_at(
        organization_id: EntityId,
        role_id: EntityId,
        inviter: EntityId,
        at: DateTime<Utc>,
    ) -> Self {
        let issued_at = DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at);
        Self {
            organization_id,
            role_id,
            inviter,
            issued_at,
        }
    }

    pub fn organization_id(&self) -> &EntityId {
        &self.organization_id
    }

    pub fn role_id(&self) -> &EntityId {
        &self.role_id
    }

    pub fn inviter(&self) -> &EntityId {
        &self.inviter
    }

    pub fn issued_at_time(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteTarget {
    pub role_id: EntityId,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InviteAck {
    pub message: String,
}

impl InviteAck {
    pub fn sent_to(email: &str) -> Self {
        Self {
            message: format!("successfully sent invitation to {}", email),
        }
    }
}
