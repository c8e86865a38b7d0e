// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Controller configuration.
//!
//! Every option is a command-line flag with an environment variable fallback,
//! so the same binary can be configured from a Deployment manifest or a shell.

use crate::constants::{
    DEFAULT_FIELD_MANAGER, DEFAULT_REQUEUE_AFTER_SECS, DEFAULT_WORKER_IMAGE,
    ERROR_REQUEUE_DURATION_SECS, METRICS_SERVER_BIND_ADDRESS,
};
use clap::Parser;
use std::time::Duration;

/// Runtime options for the `jedy` controller.
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
#[command(
    name = "jedy",
    version,
    about = "Kubernetes controller that keeps a JedyKind's worker pool at its desired size"
)]
pub struct ControllerConfig {
    /// Only watch `JedyKind` resources in this namespace (default: all namespaces)
    #[arg(long, env = "JEDY_WATCH_NAMESPACE")]
    pub namespace: Option<String>,

    /// Seconds to wait before the next pass when a pass changed the pool
    #[arg(long, env = "JEDY_REQUEUE_AFTER_SECS", default_value_t = DEFAULT_REQUEUE_AFTER_SECS)]
    pub requeue_after_secs: u64,

    /// Seconds to wait before retrying a failed pass
    #[arg(long, env = "JEDY_ERROR_REQUEUE_SECS", default_value_t = ERROR_REQUEUE_DURATION_SECS)]
    pub error_requeue_secs: u64,

    /// Address the Prometheus metrics server listens on
    #[arg(long, env = "JEDY_METRICS_BIND_ADDRESS", default_value = METRICS_SERVER_BIND_ADDRESS)]
    pub metrics_bind_address: String,

    /// Field manager used for status patches
    #[arg(long, env = "JEDY_FIELD_MANAGER", default_value = DEFAULT_FIELD_MANAGER)]
    pub field_manager: String,

    /// Worker image used when a `JedyKind` leaves `spec.image` unset
    #[arg(long, env = "JEDY_DEFAULT_IMAGE", default_value = DEFAULT_WORKER_IMAGE)]
    pub default_image: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            requeue_after_secs: DEFAULT_REQUEUE_AFTER_SECS,
            error_requeue_secs: ERROR_REQUEUE_DURATION_SECS,
            metrics_bind_address: METRICS_SERVER_BIND_ADDRESS.to_string(),
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            default_image: DEFAULT_WORKER_IMAGE.to_string(),
        }
    }
}

impl ControllerConfig {
    /// Delay before the next pass after one that changed the pool.
    #[must_use]
    pub fn requeue_after(&self) -> Duration {
        Duration::from_secs(self.requeue_after_secs)
    }

    /// Delay before retrying a failed pass.
    #[must_use]
    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_secs)
    }
}
