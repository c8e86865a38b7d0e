// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status reporting for `JedyKind` resources.
//!
//! The status is informational only: it is written after a pass has acted
//! and is never read back by the decision logic.
//!
//! # Condition Format
//!
//! Kubernetes conditions follow a standard format:
//! - `type`: The aspect of the resource being reported (`Ready`)
//! - `status`: "True", "False", or "Unknown"
//! - `reason`: A programmatic identifier (CamelCase)
//! - `message`: A human-readable explanation
//! - `lastTransitionTime`: RFC3339 timestamp when the condition changed

use super::status_changed;
use crate::crd::{Condition, JedyKind, JedyKindStatus};
use crate::engine::{DesiredSpec, ScaleAction};
use crate::observer::ClusterSnapshot;
use crate::status_reasons::{
    CONDITION_TYPE_READY, REASON_CONVERGED, REASON_SCALING_DOWN, REASON_SCALING_UP,
    STATUS_FALSE, STATUS_TRUE,
};
use crate::store::PoolStore;
use chrono::Utc;
use kube::ResourceExt;
use tracing::{debug, warn};

/// Create a new condition stamped with the current time.
#[must_use]
pub fn create_condition(
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
) -> Condition {
    Condition {
        r#type: condition_type.to_string(),
        status: status.to_string(),
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
        last_transition_time: Some(Utc::now().to_rfc3339()),
    }
}

/// Update or add a condition in a mutable conditions list (in-memory, no API call).
///
/// The existing `lastTransitionTime` is kept when the status value does not
/// change.
pub fn update_condition_in_memory(
    conditions: &mut Vec<Condition>,
    condition_type: &str,
    status: &str,
    reason: &str,
    message: &str,
) {
    if let Some(existing) = conditions.iter_mut().find(|c| c.r#type == condition_type) {
        let last_transition_time = if existing.status == status {
            existing
                .last_transition_time
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339())
        } else {
            Utc::now().to_rfc3339()
        };

        existing.status = status.to_string();
        existing.reason = Some(reason.to_string());
        existing.message = Some(message.to_string());
        existing.last_transition_time = Some(last_transition_time);
    } else {
        conditions.push(create_condition(condition_type, status, reason, message));
    }
}

/// Compare two condition lists ignoring `lastTransitionTime`.
#[must_use]
pub fn conditions_equal(current: &[Condition], new: &[Condition]) -> bool {
    if current.len() != new.len() {
        return false;
    }

    new.iter().all(|new_cond| {
        current.iter().any(|c| {
            c.r#type == new_cond.r#type
                && c.status == new_cond.status
                && c.reason == new_cond.reason
                && c.message == new_cond.message
        })
    })
}

/// Ready condition fields for the action a pass took.
fn ready_condition(
    action: &ScaleAction,
    available: usize,
    desired: usize,
) -> (&'static str, &'static str, String) {
    let counts = format!("{available}/{desired} workers available");
    match action {
        ScaleAction::NoOp => (STATUS_TRUE, REASON_CONVERGED, counts),
        ScaleAction::ScaleUp { add_master: true } => (
            STATUS_FALSE,
            REASON_SCALING_UP,
            format!("{counts}, adding a master"),
        ),
        ScaleAction::ScaleUp { add_master: false } => (
            STATUS_FALSE,
            REASON_SCALING_UP,
            format!("{counts}, adding a slave"),
        ),
        ScaleAction::ScaleDown { victims } => (
            STATUS_FALSE,
            REASON_SCALING_DOWN,
            format!("{counts}, removing {}", victims.len()),
        ),
    }
}

/// Build the status to report for `owner` after a pass.
///
/// Counts describe the snapshot the pass decided on, not the state after the
/// action was applied.
#[must_use]
pub fn build_status(
    owner: &JedyKind,
    snapshot: &ClusterSnapshot,
    desired: DesiredSpec,
    action: &ScaleAction,
) -> JedyKindStatus {
    let mut conditions = owner
        .status
        .as_ref()
        .map(|s| s.conditions.clone())
        .unwrap_or_default();

    let (status, reason, message) = ready_condition(action, snapshot.available_count, desired.size);
    update_condition_in_memory(
        &mut conditions,
        CONDITION_TYPE_READY,
        status,
        reason,
        &message,
    );

    JedyKindStatus {
        conditions,
        observed_generation: owner.metadata.generation,
        available_workers: Some(i32::try_from(snapshot.available_count).unwrap_or(i32::MAX)),
        desired_workers: Some(i32::try_from(desired.size).unwrap_or(i32::MAX)),
        master_present: Some(snapshot.master_present),
    }
}

/// Whether `new` differs from the owner's current status in anything but timestamps.
#[must_use]
pub fn needs_update(current: Option<&JedyKindStatus>, new: &JedyKindStatus) -> bool {
    let Some(current) = current else {
        return true;
    };

    status_changed(&current.observed_generation, &new.observed_generation)
        || status_changed(&current.available_workers, &new.available_workers)
        || status_changed(&current.desired_workers, &new.desired_workers)
        || status_changed(&current.master_present, &new.master_present)
        || !conditions_equal(&current.conditions, &new.conditions)
}

/// Write `status` to the owner if it changed.
///
/// Failures are logged and swallowed; they never change a pass's outcome.
/// Returns whether a write succeeded.
pub async fn update_owner_status(
    store: &dyn PoolStore,
    owner: &JedyKind,
    status: &JedyKindStatus,
) -> bool {
    let name = owner.name_any();
    let namespace = owner.namespace().unwrap_or_default();

    if !needs_update(owner.status.as_ref(), status) {
        debug!("Status of JedyKind {}/{} unchanged, skipping update", namespace, name);
        return false;
    }

    match store.update_status(&namespace, &name, status).await {
        Ok(()) => {
            debug!("Updated status of JedyKind {}/{}", namespace, name);
            true
        }
        Err(e) => {
            warn!("Failed to update status of JedyKind {}/{}: {}", namespace, name, e);
            false
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
