//! Archive operations: authors, articles, comments and favorites.
//!
//! Every operation takes the caller as `Option<&User>`; the identity provider
//! sits outside this crate. Results come back as the view structs in
//! [`crate::forms`].

mod articles;
mod authors;
mod comments;
mod favorites;

use crate::config::ArchiveConfig;
use crate::document::Document;
use crate::errors::ArchiveError;
use crate::forms::ArticleForm;
use crate::keys::Key;
use crate::store::{DocumentStore, MemoryStore};
use crate::types::User;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) const AUTHORIZATION_REQUIRED: &str = "Authorization required";

pub struct ArchiveService {
    store: Arc<dyn DocumentStore>,
    config: ArchiveConfig,
}

impl ArchiveService {
    pub fn new(store: Arc<dyn DocumentStore>, config: ArchiveConfig) -> Self {
        Self { store, config }
    }

    /// Service over a fresh [`MemoryStore`] built from `config`.
    #[must_use]
    pub fn in_memory(config: ArchiveConfig) -> Self {
        let store = Arc::new(MemoryStore::with_config(&config));
        Self::new(store, config)
    }

    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    #[must_use]
    pub const fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Build article views, loading each parent Author once.
    fn article_forms(&self, articles: impl IntoIterator<Item = Document>, author: Option<&Document>) -> Vec<ArticleForm> {
        let mut parents: HashMap<Key, Option<Document>> = HashMap::new();
        articles
            .into_iter()
            .map(|article| match (author, article.key.parent()) {
                (Some(a), _) => ArticleForm::from_entity(&article, Some(a)),
                (None, Some(parent)) => {
                    let loaded = parents.entry(parent.clone()).or_insert_with(|| self.store.get(parent));
                    ArticleForm::from_entity(&article, loaded.as_ref())
                }
                (None, None) => ArticleForm::from_entity(&article, None),
            })
            .collect()
    }
}

fn require_user(user: Option<&User>) -> Result<&User, ArchiveError> {
    user.ok_or_else(|| ArchiveError::Unauthorized(AUTHORIZATION_REQUIRED.into()))
}

/// `Some` only for non-blank text.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
