use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Opaque identifier for users, organizations and roles. Either a number or a
/// string, whichever the data layer hands out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Str(String),
}

impl EntityId {
    pub fn record(&self, table: &str) -> RecordId {
        match self {
            EntityId::Int(key) => RecordId::from_table_key(table, *key),
            EntityId::Str(key) => RecordId::from_table_key(table, key.clone()),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(id) => write!(f, "{}", id),
            EntityId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Int(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Str(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::Str(value)
    }
}

/// The verified caller of an authenticated route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterIdentity {
    pub uid: String,
    pub email: Option<String>,
    /// Raw provider token, needed to act on the caller's own account.
    pub id_token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: EntityId,
    pub uid: String, // ! identity provider uid, unique
    pub email: Option<String>,
    pub first_name: String, // ! & (len = 100)
    pub last_name: String,  // ! & (len = 100)
    pub phone: Option<String>,
    pub organization_id: EntityId,
    pub role_id: EntityId,
    pub invited_by: Option<EntityId>,
    pub created_at: DateTime<Utc>,
}

/// Row written at registration time. The record key is the provider uid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub uid: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub organization_id: EntityId,
    pub role_id: EntityId,
    pub invited_by: Option<EntityId>,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn into_record(self, id: EntityId) -> UserRecord {
        UserRecord {
            id,
            uid: self.uid,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            organization_id: self.organization_id,
            role_id: self.role_id,
            invited_by: self.invited_by,
            created_at: self.created_at,
        }
    }
}
