//! Per-author list of favorite articles.
//!
//! The list lives on the Author entity as `favoriteArticles`: websafe article
//! references in the order they were added, never duplicated. Mutations run
//! as a read-modify-write transaction on the owner.

use crate::document::Document;
use crate::errors::ArchiveError;
use crate::keys::{Key, Kind};
use crate::store::DocumentStore;
use crate::telemetry;

pub const FAVORITES_ATTR: &str = "favoriteArticles";
pub(crate) const ALREADY_FAVORITE: &str = "This article is already in your favorites";
pub(crate) const NOT_A_FAVORITE: &str = "This article is not in your favorites list";

pub struct FavoritesManager<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> FavoritesManager<'a> {
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Append `reference` to the owner's favorites.
    ///
    /// # Errors
    /// `NotFound` if the reference is not an existing article or the owner is
    /// missing, `Conflict` if it is already a favorite.
    pub fn add_favorite(&self, owner: &Key, reference: &str) -> Result<(), ArchiveError> {
        self.store.check_ref(reference, Kind::Article)?;
        self.store.transact(owner, &mut |doc: &mut Document| {
            let mut favorites = doc.get_string_list(FAVORITES_ATTR);
            if favorites.iter().any(|r| r == reference) {
                return Err(ArchiveError::Conflict(ALREADY_FAVORITE.into()));
            }
            favorites.push(reference.to_string());
            doc.set_string_list(FAVORITES_ATTR, &favorites);
            Ok(())
        })?;
        telemetry::log_audit("favorite_add", reference, Some(&owner.to_string()));
        Ok(())
    }

    /// Drop `reference` from the owner's favorites, keeping the rest in order.
    ///
    /// # Errors
    /// `NotFound` if the reference is not an existing article, the owner is
    /// missing, or the article is not a favorite.
    pub fn remove_favorite(&self, owner: &Key, reference: &str) -> Result<(), ArchiveError> {
        self.store.check_ref(reference, Kind::Article)?;
        self.store.transact(owner, &mut |doc: &mut Document| {
            let mut favorites = doc.get_string_list(FAVORITES_ATTR);
            let Some(pos) = favorites.iter().position(|r| r == reference) else {
                return Err(ArchiveError::NotFound(NOT_A_FAVORITE.into()));
            };
            favorites.remove(pos);
            doc.set_string_list(FAVORITES_ATTR, &favorites);
            Ok(())
        })?;
        telemetry::log_audit("favorite_remove", reference, Some(&owner.to_string()));
        Ok(())
    }

    /// Current favorites, oldest first.
    ///
    /// # Errors
    /// `NotFound` if the owner does not exist.
    pub fn list_favorites(&self, owner: &Key) -> Result<Vec<String>, ArchiveError> {
        self.store
            .get(owner)
            .map(|d| d.get_string_list(FAVORITES_ATTR))
            .ok_or_else(|| ArchiveError::NotFound(format!("No {} found with key: {owner}", owner.kind)))
    }
}
