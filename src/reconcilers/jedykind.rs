// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `JedyKind` reconciliation logic.
//!
//! One pass re-reads the owner, observes its workers, decides on a single
//! corrective step and applies it. Passes hold no state between invocations:
//! duplicate or delayed passes are harmless because every decision is made
//! from a fresh observation.

use super::status::{build_status, update_owner_status};
use crate::context::Context;
use crate::engine::{decide, DesiredSpec, ScaleAction};
use crate::errors::PoolError;
use crate::executor::execute;
use crate::metrics;
use crate::observer::observe;
use tracing::{debug, info};

/// Result of one successful reconcile pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Whether another pass should run soon
    pub requeue: bool,
    /// The action the pass applied; `None` when the owner no longer exists
    pub action: Option<ScaleAction>,
}

impl ReconcileOutcome {
    fn owner_gone() -> Self {
        Self {
            requeue: false,
            action: None,
        }
    }
}

/// Run one reconcile pass for the `JedyKind` `namespace/name`.
///
/// Returns `requeue = true` after a scale-up or scale-down, since the pool
/// may still be away from its desired size, and `requeue = false` after a
/// no-op or when the owner has been deleted.
///
/// # Errors
///
/// Returns the [`PoolError`] of the first failing step. Reading the owner,
/// listing workers and applying the action can fail; the steps after a
/// failure are skipped. A failed status update is logged and not returned.
pub async fn reconcile_jedykind(
    ctx: &Context,
    namespace: &str,
    name: &str,
) -> Result<ReconcileOutcome, PoolError> {
    info!("Reconciling JedyKind: {}/{}", namespace, name);

    let Some(owner) = ctx.store.get_owner(namespace, name).await? else {
        info!("JedyKind {}/{} not found, nothing to do", namespace, name);
        metrics::forget_pool(namespace, name);
        return Ok(ReconcileOutcome::owner_gone());
    };

    let desired = DesiredSpec::from_owner(&owner.spec);
    debug!(
        desired_size = desired.size,
        generation = ?owner.metadata.generation,
        "Fetched JedyKind spec"
    );

    let snapshot = observe(ctx.store.as_ref(), namespace, name).await?;
    metrics::record_pool_state(
        namespace,
        name,
        desired.size,
        snapshot.available_count,
        snapshot.master_present,
    );

    let action = decide(desired, &snapshot);
    info!(
        "JedyKind {}/{}: {} available, {} desired, action: {}",
        namespace, name, snapshot.available_count, desired.size, action
    );

    let report = execute(
        ctx.store.as_ref(),
        &owner,
        &action,
        ctx.tokens.as_ref(),
        &ctx.config.default_image,
    )
    .await?;
    debug!(?report, "Applied action for JedyKind {}/{}", namespace, name);

    let status = build_status(&owner, &snapshot, desired, &action);
    update_owner_status(ctx.store.as_ref(), &owner, &status).await;

    let requeue = action.changes_pool();
    if matches!(action, ScaleAction::NoOp) {
        info!("JedyKind {}/{} has converged", namespace, name);
    }

    Ok(ReconcileOutcome {
        requeue,
        action: Some(action),
    })
}

#[cfg(test)]
#[path = "jedykind_tests.rs"]
mod jedykind_tests;
