pub mod config;
pub mod devlog;
pub mod document;
pub mod errors;
pub mod favorites;
pub mod forms;
pub mod keys;
pub mod logger;
pub mod query;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod types;

pub use config::ArchiveConfig;
pub use errors::ArchiveError;
pub use favorites::FavoritesManager;
pub use keys::{Key, KeyId, Kind};
pub use service::ArchiveService;
pub use store::{DocumentStore, MemoryStore};
pub use types::User;

use std::path::Path;

/// Load configuration, set up logging and build an in-memory archive.
///
/// This should be called once at process start; the logger keeps the first
/// configuration it was given.
///
/// # Errors
/// Returns an error if the config file cannot be parsed or logging cannot be
/// set up.
pub fn init(config_path: Option<&Path>) -> Result<ArchiveService, Box<dyn std::error::Error>> {
    let config = ArchiveConfig::load(config_path)?;
    logger::configure_from_config(&config)?;
    log::info!(
        "archive ready: retries={} sort={} max_results={}",
        config.transaction_retries,
        config.default_sort_field,
        config.max_query_results
    );
    Ok(ArchiveService::in_memory(config))
}
