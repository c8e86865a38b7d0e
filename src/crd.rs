// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for worker pool management.
//!
//! # Resource Types
//!
//! - [`JedyKind`] - Declares a pool of worker replicas with one elected master
//!
//! # Example
//!
//! ```rust,no_run
//! use jedy::crd::JedyKindSpec;
//!
//! let spec = JedyKindSpec {
//!     size: 3,
//!     image: None,
//! };
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition represents an observation of a resource's current state.
///
/// Conditions are used in status subresources to communicate the state of
/// a resource to users and controllers.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition. Jedy only reports `Ready`.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Brief CamelCase reason for the condition's last transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message indicating details about the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

/// `JedyKind` declares a pool of worker pods with exactly one master.
///
/// The controller converges the number of available worker pods to `size`,
/// adding one worker per reconcile pass and labelling the first one it
/// creates while no master is present as the master. Each worker gets its own
/// discovery `Service`.
///
/// # Example
///
/// ```yaml
/// apiVersion: cache.jedy.io/v1alpha1
/// kind: JedyKind
/// metadata:
///   name: cache1
///   namespace: default
/// spec:
///   size: 3
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "cache.jedy.io",
    version = "v1alpha1",
    kind = "JedyKind",
    plural = "jedykinds",
    namespaced,
    doc = "JedyKind declares a pool of worker pods converged to a desired size, with one worker labelled as master and the rest as slaves.",
    printcolumn = r#"{"name":"Size", "type":"integer", "jsonPath":".spec.size"}"#,
    printcolumn = r#"{"name":"Available", "type":"integer", "jsonPath":".status.availableWorkers"}"#,
    printcolumn = r#"{"name":"Master", "type":"boolean", "jsonPath":".status.masterPresent"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[kube(status = "JedyKindStatus")]
#[serde(rename_all = "camelCase")]
pub struct JedyKindSpec {
    /// Desired number of worker pods.
    ///
    /// Negative values are treated as zero.
    #[schemars(range(min = 0))]
    pub size: i32,

    /// Container image for worker pods.
    ///
    /// Falls back to the controller's default image when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// `JedyKind` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JedyKindStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Number of workers in phase Pending or Running at the last pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_workers: Option<i32>,

    /// Desired size seen at the last pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_workers: Option<i32>,

    /// Whether an available worker carried `isMaster=true` at the last pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_present: Option<bool>,
}

#[cfg(test)]
#[path = "crd_tests.rs"]
mod crd_tests;
