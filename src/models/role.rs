use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Only existence matters to the invite gate; the remaining columns are
/// owned elsewhere.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Role {
    pub id: RecordId,
}
