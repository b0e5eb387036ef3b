//! Subcommand implementations.

pub mod dashboard;
pub mod init;
pub mod publish;
pub mod subjects;
pub mod submit;
pub mod validate;

use examportal_core::config::PortalConfig;
use examportal_core::store::PortalStore;

/// Open the store at the configured data directory.
pub fn open_store(config: &PortalConfig) -> PortalStore {
    tracing::debug!(data_dir = %config.data_dir.display(), "opening store");
    PortalStore::new(&config.data_dir)
}
