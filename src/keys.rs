//! Entity keys and their opaque websafe form.
//!
//! A key names one stored entity: its kind, its id within the parent, and an
//! optional parent key. Articles live under their Author and Comments under
//! their Article, so ancestor queries fall out of the key path.

use crate::errors::ArchiveError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    Author,
    Article,
    Comment,
}

impl Kind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Author => "Author",
            Self::Article => "Article",
            Self::Comment => "Comment",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyId {
    Int(i64),
    Name(String),
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Name(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Key {
    pub kind: Kind,
    pub id: KeyId,
    pub parent: Option<Box<Key>>,
}

impl Key {
    #[must_use]
    pub fn named(kind: Kind, name: impl Into<String>) -> Self {
        Self { kind, id: KeyId::Name(name.into()), parent: None }
    }

    #[must_use]
    pub fn int(kind: Kind, id: i64) -> Self {
        Self { kind, id: KeyId::Int(id), parent: None }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: &Self) -> Self {
        self.parent = Some(Box::new(parent.clone()));
        self
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.parent.as_deref()
    }

    /// True when `ancestor` appears anywhere on this key's parent chain.
    #[must_use]
    pub fn has_ancestor(&self, ancestor: &Self) -> bool {
        let mut cur = self.parent();
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = p.parent();
        }
        false
    }

    /// Opaque, stable reference string for this key.
    #[must_use]
    pub fn urlsafe(&self) -> String {
        // Key contains only strings, integers and enums; serialization cannot fail.
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(bytes)
    }

    /// Decode a websafe reference produced by [`Key::urlsafe`].
    ///
    /// # Errors
    /// Returns `NotFound("Invalid key: ...")` when the text is not a key.
    pub fn from_urlsafe(websafe: &str) -> Result<Self, ArchiveError> {
        let invalid = || ArchiveError::NotFound(format!("Invalid key: {websafe}"));
        let bytes = hex::decode(websafe).map_err(|_| invalid())?;
        serde_json::from_slice(&bytes).map_err(|_| invalid())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = self.parent() {
            write!(f, "{p}/")?;
        }
        write!(f, "{}:{}", self.kind, self.id)
    }
}
