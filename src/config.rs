//! Run configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, USER_AGENT};

/// Options for one inlining run.
#[derive(Debug, Clone)]
pub struct InlineOptions {
    /// Base directory against which relative asset paths resolve.
    pub base_dir: PathBuf,
    /// User agent sent with remote fetches.
    pub user_agent: String,
    /// Timeout applied to each remote fetch.
    pub http_timeout: Duration,
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            user_agent: USER_AGENT.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl InlineOptions {
    /// Options resolving relative assets against `base_dir`.
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }
}
