use crate::types::SerializableDateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub created_at: SerializableDateTime,
    pub updated_at: SerializableDateTime,
    /// Bumped on every committed write; transactions compare it to detect collisions.
    pub version: u64,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        let now = SerializableDateTime::now();
        Self { created_at: now, updated_at: now, version: 0 }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}
