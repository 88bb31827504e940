//! Query configuration
//!
//! Controls observability only. Results never depend on configuration.

use serde::{Deserialize, Serialize};

/// Configuration for query evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Log begin/complete events for each evaluation
    pub observe: bool,
    /// Log one TRACE event per applied operator
    pub log_stages: bool,
}

impl QueryConfig {
    /// Config with begin/complete and per-stage logging enabled
    pub fn observed() -> Self {
        Self {
            observe: true,
            log_stages: true,
        }
    }
}
