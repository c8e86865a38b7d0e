// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for worker pool reconciliation.
//!
//! Every failure inside a reconcile pass is transient from the controller's
//! point of view: the pass stops, the error is returned, and the controller
//! schedules a fresh pass. A missing owner is not an error at all, it is
//! reported as `Ok(None)` by [`crate::store::PoolStore::get_owner`].

use thiserror::Error;

/// Errors that can end a reconcile pass early.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Reading the owner `JedyKind` failed for a reason other than not-found.
    #[error("Failed to read JedyKind {namespace}/{name}: {source}")]
    OwnerRead {
        /// Namespace of the owner
        namespace: String,
        /// Name of the owner
        name: String,
        /// Underlying API error
        #[source]
        source: kube::Error,
    },

    /// Listing the workers of an owner failed.
    ///
    /// The observation is not retried inside the pass.
    #[error("Failed to list workers for {owner}: {source}")]
    List {
        /// `namespace/name` of the owner
        owner: String,
        /// Underlying API error
        #[source]
        source: kube::Error,
    },

    /// Creating a worker pod or endpoint service failed.
    #[error("Failed to create {kind} {name}: {source}")]
    Create {
        /// Kind of object being created (`Pod` or `Service`)
        kind: &'static str,
        /// Name of the object being created
        name: String,
        /// Underlying API error
        #[source]
        source: kube::Error,
    },

    /// Deleting a worker pod failed.
    #[error("Failed to delete {kind} {name}: {source}")]
    Delete {
        /// Kind of object being deleted
        kind: &'static str,
        /// Name of the object being deleted
        name: String,
        /// Underlying API error
        #[source]
        source: kube::Error,
    },

    /// Patching the owner status failed.
    #[error("Failed to update status of {owner}: {source}")]
    StatusUpdate {
        /// `namespace/name` of the owner
        owner: String,
        /// Underlying API error
        #[source]
        source: kube::Error,
    },

    /// The owner is missing metadata required to link owned objects to it.
    #[error("JedyKind is missing metadata.{field}")]
    MissingMetadata {
        /// Name of the missing metadata field
        field: &'static str,
    },
}

impl PoolError {
    /// Whether the controller should try again on a later pass.
    ///
    /// There is no fatal class: the next pass starts from a fresh
    /// observation, so every failure is worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        true
    }

    /// Stable `error_type` label for metrics.
    #[must_use]
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::OwnerRead { .. } => "owner_read_error",
            Self::List { .. } => "list_error",
            Self::Create { .. } => "create_error",
            Self::Delete { .. } => "delete_error",
            Self::StatusUpdate { .. } => "status_error",
            Self::MissingMetadata { .. } => "validation_error",
        }
    }
}

/// Whether a kube error is an API `404 Not Found`.
#[must_use]
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(ae) if ae.code == 404)
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
