// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Point-in-time observation of the workers belonging to one owner.
//!
//! The observer lists every pod labelled `app=<owner>`, drops the ones already
//! marked for deletion, classifies the rest by lifecycle phase and records
//! whether an available worker carries the master flag. The read is not
//! transactional: anything another actor changes after the list call is only
//! seen by the next pass.

use crate::errors::PoolError;
use crate::labels::{APP_LABEL, INTERNAL_SERVICE_LABEL, IS_MASTER_LABEL, IS_MASTER_TRUE};
use crate::store::PoolStore;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Lifecycle phase of a worker, as far as reconciliation cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerPhase {
    Pending,
    Running,
    /// Marked for deletion; never counted as available.
    Terminating,
    /// Succeeded, Failed, Unknown or no phase reported yet.
    Other,
}

impl WorkerPhase {
    /// Classify a pod. A deletion timestamp wins over the reported phase.
    #[must_use]
    pub fn classify(pod: &Pod) -> Self {
        if pod.metadata.deletion_timestamp.is_some() {
            return Self::Terminating;
        }

        match pod.status.as_ref().and_then(|s| s.phase.as_deref()) {
            Some("Pending") => Self::Pending,
            Some("Running") => Self::Running,
            _ => Self::Other,
        }
    }

    /// Pending and Running workers count towards the desired size.
    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

/// The pool labels every worker carries.
///
/// `is_master` is kept as the raw label string; only the exact value
/// `"true"` marks a master.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkerLabels {
    pub app: String,
    pub internal_service: String,
    pub is_master: String,
}

impl WorkerLabels {
    /// Read the pool labels from an object's label map. Missing labels read as empty.
    #[must_use]
    pub fn from_map(labels: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| labels.get(key).cloned().unwrap_or_default();
        Self {
            app: get(APP_LABEL),
            internal_service: get(INTERNAL_SERVICE_LABEL),
            is_master: get(IS_MASTER_LABEL),
        }
    }

    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (APP_LABEL.to_string(), self.app.clone()),
            (
                INTERNAL_SERVICE_LABEL.to_string(),
                self.internal_service.clone(),
            ),
            (IS_MASTER_LABEL.to_string(), self.is_master.clone()),
        ])
    }

    #[must_use]
    pub fn is_master(&self) -> bool {
        self.is_master == IS_MASTER_TRUE
    }
}

/// One worker replica.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerRecord {
    /// Object uid; empty for a worker that has not been created yet.
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub labels: WorkerLabels,
    pub phase: WorkerPhase,
    /// Pod IP, informational only.
    pub address: Option<String>,
}

impl WorkerRecord {
    #[must_use]
    pub fn from_pod(pod: &Pod) -> Self {
        Self {
            id: pod.metadata.uid.clone().unwrap_or_default(),
            name: pod.name_any(),
            namespace: pod.namespace().unwrap_or_default(),
            labels: WorkerLabels::from_map(pod.labels()),
            phase: WorkerPhase::classify(pod),
            address: pod.status.as_ref().and_then(|s| s.pod_ip.clone()),
        }
    }

    /// The generated worker-group suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.labels.internal_service
    }

    #[must_use]
    pub fn is_master(&self) -> bool {
        self.labels.is_master()
    }
}

/// Live workers of one owner, in listing order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterSnapshot {
    pub owner_id: String,
    /// Workers not marked for deletion, in the order the store listed them.
    pub workers: Vec<WorkerRecord>,
    /// Workers in phase Pending or Running.
    pub available_count: usize,
    /// Whether an available worker carries `isMaster=true`.
    pub master_present: bool,
}

impl ClusterSnapshot {
    /// Empty snapshot for an owner with no workers.
    #[must_use]
    pub fn empty(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            workers: Vec::new(),
            available_count: 0,
            master_present: false,
        }
    }

    /// Available workers in snapshot order.
    pub fn available_workers(&self) -> impl Iterator<Item = &WorkerRecord> {
        self.workers.iter().filter(|w| w.phase.is_available())
    }
}

/// Build a snapshot from a listing of pods.
#[must_use]
pub fn build_snapshot(owner_id: &str, pods: &[Pod]) -> ClusterSnapshot {
    let workers: Vec<WorkerRecord> = pods
        .iter()
        .map(WorkerRecord::from_pod)
        .filter(|w| w.phase != WorkerPhase::Terminating)
        .collect();

    let mut available_count = 0;
    let mut master_present = false;

    for worker in workers.iter().filter(|w| w.phase.is_available()) {
        available_count += 1;
        master_present |= worker.is_master();

        debug!(
            worker = %worker.name,
            phase = ?worker.phase,
            address = ?worker.address,
            is_master = %worker.labels.is_master,
            "Observed available worker"
        );
    }

    ClusterSnapshot {
        owner_id: owner_id.to_string(),
        workers,
        available_count,
        master_present,
    }
}

/// List the workers of `namespace/owner_name` and build a snapshot.
///
/// # Errors
///
/// Returns [`PoolError::List`] if the listing fails. The call is not retried.
pub async fn observe(
    store: &dyn PoolStore,
    namespace: &str,
    owner_name: &str,
) -> Result<ClusterSnapshot, PoolError> {
    let pods = store.list_workers(namespace, owner_name).await?;
    let snapshot = build_snapshot(owner_name, &pods);

    info!(
        "Observed {} available of {} listed workers for {}/{} (master present: {})",
        snapshot.available_count,
        pods.len(),
        namespace,
        owner_name,
        snapshot.master_present
    );

    Ok(snapshot)
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod observer_tests;
