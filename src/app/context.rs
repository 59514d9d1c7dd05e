use std::path::Path;

use crate::app::error::{DocketError, Result};
use crate::config::Config;
use crate::engine::CaseEngine;

/// Shared state for CLI commands.
///
/// Holds configuration only. Engines are built per query so no session
/// cookies or endpoint cache leak from one lookup into the next.
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    /// Load configuration from `path`, or from the default location
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Config::load_from(p),
            None => Config::load(),
        }
        .map_err(|e| DocketError::Config(e.to_string()))?;

        Ok(Self { config })
    }

    /// A fresh engine with its own HTTP session
    pub fn engine(&self) -> Result<CaseEngine> {
        CaseEngine::new(self.config.engine.clone(), self.config.fetcher.clone())
    }
}
