use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{0}")]
    InvalidFilter(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("transaction collision on {key} after {attempts} attempts")]
    TransactionCollision { key: String, attempts: u32 },

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(#[from] bson::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl ArchiveError {
    /// HTTP status the transport layer should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidFilter(_) | Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) | Self::TransactionCollision { .. } => 409,
            Self::Json(_) | Self::Bson(_) | Self::Io(_) | Self::Config(_) => 500,
        }
    }

    /// Client errors are terminal: the caller sent something the archive refuses.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.status_code(), 400..=499)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_distinguish_conflict_from_not_found() {
        assert_eq!(ArchiveError::Conflict("dup".into()).status_code(), 409);
        assert_eq!(ArchiveError::NotFound("gone".into()).status_code(), 404);
        assert_eq!(ArchiveError::InvalidFilter("bad".into()).status_code(), 400);
        assert_eq!(ArchiveError::Config("x".into()).status_code(), 500);
    }

    #[test]
    fn display_passes_message_through() {
        let e = ArchiveError::InvalidFilter("Inequality filter is allowed on only one field.".into());
        assert_eq!(e.to_string(), "Inequality filter is allowed on only one field.");
        assert!(e.is_client_error());
        assert!(!ArchiveError::Config("x".into()).is_client_error());
    }
}
