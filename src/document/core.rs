use crate::document::types::Metadata;
use crate::keys::{Key, Kind};
use crate::types::SerializableDateTime;
use bson::{Bson, Document as BsonDocument};
use serde::{Deserialize, Serialize};

/// One stored entity: its key, its attributes and bookkeeping metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub key: Key,
    pub data: BsonDocument,
    pub metadata: Metadata,
}

impl Document {
    #[must_use]
    pub fn new(key: Key, data: BsonDocument) -> Self {
        Self { key, data, metadata: Metadata::new() }
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.key.kind
    }

    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.data.get(field) {
            Some(Bson::String(s)) => Some(s),
            _ => None,
        }
    }

    /// String elements of a repeated attribute; absent or mistyped reads as empty.
    #[must_use]
    pub fn get_string_list(&self, field: &str) -> Vec<String> {
        match self.data.get(field) {
            Some(Bson::Array(items)) => items
                .iter()
                .filter_map(|b| match b {
                    Bson::String(s) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Bson>) {
        self.data.insert(field, value.into());
    }

    pub fn set_string_list(&mut self, field: &str, values: &[String]) {
        let arr: Vec<Bson> = values.iter().cloned().map(Bson::String).collect();
        self.data.insert(field, Bson::Array(arr));
    }

    pub fn touch(&mut self) {
        self.metadata.updated_at = SerializableDateTime::now();
    }
}
