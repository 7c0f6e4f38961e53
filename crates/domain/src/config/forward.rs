use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Forwarding engine knobs. `upstream` has no default on purpose: the
/// operator must say where queries go (see `Config::validate`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForwardConfig {
    #[serde(default)]
    pub upstream: String,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl ForwardConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            upstream: String::new(),
            query_timeout_ms: default_query_timeout_ms(),
            max_in_flight: default_max_in_flight(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

fn default_query_timeout_ms() -> u64 {
    3000
}

fn default_max_in_flight() -> usize {
    512
}

fn default_shutdown_grace_ms() -> u64 {
    5000
}
