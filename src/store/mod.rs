//! Document store collaborator.
//!
//! Everything the archive persists goes through [`DocumentStore`]. The trait
//! mirrors what the hosted datastore offers: keyed get/put, id allocation,
//! ordered queries, and a read-modify-write transaction on one entity.

mod cursor;
mod memory;
mod query;

pub use cursor::Cursor;
pub use memory::MemoryStore;
pub use query::EntityQuery;

use crate::document::Document;
use crate::errors::ArchiveError;
use crate::keys::{Key, Kind};

pub trait DocumentStore: Send + Sync {
    fn get(&self, key: &Key) -> Option<Document>;

    fn get_multi(&self, keys: &[Key]) -> Vec<Option<Document>> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Insert or overwrite; bumps the entity version.
    ///
    /// # Errors
    /// Implementations may fail on backend errors.
    fn put(&self, doc: Document) -> Result<Key, ArchiveError>;

    /// Insert `doc` unless its key is already taken.
    ///
    /// Returns the stored entity and `true` when this call inserted it. The
    /// existence check and the insert are one atomic step.
    ///
    /// # Errors
    /// Implementations may fail on backend errors.
    fn put_if_absent(&self, doc: Document) -> Result<(Document, bool), ArchiveError>;

    fn delete(&self, key: &Key) -> bool;

    /// Fresh integer key of `kind` under `parent`.
    fn allocate_id(&self, kind: Kind, parent: Option<&Key>) -> Key;

    fn run_query(&self, query: &EntityQuery) -> Cursor;

    /// Read-modify-write one entity atomically.
    ///
    /// `apply` may run more than once when a concurrent writer wins the race.
    /// If it returns an error nothing is written.
    ///
    /// # Errors
    /// `NotFound` if the entity is missing, `TransactionCollision` when
    /// retries are exhausted, or whatever `apply` returned.
    fn transact(
        &self,
        key: &Key,
        apply: &mut dyn FnMut(&mut Document) -> Result<(), ArchiveError>,
    ) -> Result<Document, ArchiveError>;

    /// Decode a websafe reference and check it names an existing entity of `kind`.
    ///
    /// # Errors
    /// `NotFound` when the reference is malformed, of another kind, or missing.
    fn check_ref(&self, websafe: &str, kind: Kind) -> Result<Key, ArchiveError> {
        let key = Key::from_urlsafe(websafe)?;
        if key.kind != kind {
            return Err(ArchiveError::NotFound(format!("Not a key of the {kind} Kind: {websafe}")));
        }
        if self.get(&key).is_none() {
            return Err(ArchiveError::NotFound(format!("No {kind} found with key: {websafe}")));
        }
        Ok(key)
    }
}
