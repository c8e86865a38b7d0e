// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard Kubernetes status condition reasons for `JedyKind` resources.
//!
//! Reasons are programmatic identifiers in CamelCase that explain why a
//! condition has a particular status.
//!
//! # Condition Types
//!
//! A `JedyKind` carries a single `type: Ready` condition. It is `True` once a
//! pass finds nothing to do and `False` while the pool is still being scaled.
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   observedGeneration: 2
//!   desiredWorkers: 3
//!   availableWorkers: 2
//!   masterPresent: true
//!   conditions:
//!     - type: Ready
//!       status: "False"
//!       reason: ScalingUp
//!       message: "2/3 workers available, adding a slave"
//! ```

/// Condition type reported on every `JedyKind`.
pub const CONDITION_TYPE_READY: &str = "Ready";

/// Available workers match the desired size and a master is present
/// (or the desired size is zero).
pub const REASON_CONVERGED: &str = "Converged";

/// A worker was just added; more passes may follow.
pub const REASON_SCALING_UP: &str = "ScalingUp";

/// Surplus workers were just deleted.
pub const REASON_SCALING_DOWN: &str = "ScalingDown";

/// Condition status value for a satisfied condition.
pub const STATUS_TRUE: &str = "True";

/// Condition status value for an unsatisfied condition.
pub const STATUS_FALSE: &str = "False";

#[cfg(test)]
#[path = "status_reasons_tests.rs"]
mod status_reasons_tests;
