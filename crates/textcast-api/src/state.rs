//! Application state shared by every handler.

use std::sync::Arc;

use textcast_core::Config;
use textcast_db::RecordStore;
use textcast_processing::Narrator;
use textcast_storage::Storage;

/// Everything a request needs, built once at startup.
///
/// Collaborators sit behind traits so tests can swap in fakes.
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub records: Arc<dyn RecordStore>,
    pub narrator: Arc<Narrator>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        records: Arc<dyn RecordStore>,
        narrator: Arc<Narrator>,
    ) -> Self {
        Self {
            config,
            storage,
            records,
            narrator,
        }
    }

    pub fn company_id(&self) -> &str {
        self.config.company_id()
    }
}
