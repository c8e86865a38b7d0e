// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Jedy operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for the Jedy CRDs
pub const API_GROUP: &str = "cache.jedy.io";

/// API version for the Jedy CRDs
pub const API_VERSION: &str = "v1alpha1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "cache.jedy.io/v1alpha1";

/// Kind name for the `JedyKind` owner resource
pub const KIND_JEDY_KIND: &str = "JedyKind";

/// Kind name used for worker replicas in logs and metrics
pub const KIND_POD: &str = "Pod";

/// Kind name used for worker endpoints in logs and metrics
pub const KIND_SERVICE: &str = "Service";

// ============================================================================
// Worker Endpoint Constants
// ============================================================================

/// Discovery port exposed by every worker endpoint
pub const DISCOVERY_PORT: i32 = 26379;

/// Container port the discovery port is mapped onto
pub const WORKER_TARGET_PORT: i32 = 3306;

/// Name of the discovery port on the endpoint `Service`
pub const DISCOVERY_PORT_NAME: &str = "sentinel";

/// Protocol of the discovery port
pub const DISCOVERY_PROTOCOL: &str = "TCP";

// ============================================================================
// Worker Template Constants
// ============================================================================

/// Container name for worker pods
pub const WORKER_CONTAINER_NAME: &str = "busybox";

/// Default container image for worker pods
pub const DEFAULT_WORKER_IMAGE: &str = "busybox";

/// Command executed by the worker container
pub const WORKER_COMMAND: [&str; 2] = ["sleep", "3600"];

// ============================================================================
// Name Token Constants
// ============================================================================

/// Length of the generated worker suffix
pub const WORKER_SUFFIX_LENGTH: usize = 5;

/// Alphabet the worker suffix is drawn from
pub const WORKER_SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

// ============================================================================
// Controller Requeue Constants
// ============================================================================

/// Requeue delay after a pass that changed the pool (1 second)
pub const DEFAULT_REQUEUE_AFTER_SECS: u64 = 1;

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Field manager used for status patches
pub const DEFAULT_FIELD_MANAGER: &str = "jedy-controller";

// ============================================================================
// Kubernetes API Constants
// ============================================================================

/// Page size for Kubernetes list calls
pub const KUBE_LIST_PAGE_SIZE: u32 = 100;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Default bind address for the Prometheus metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";
