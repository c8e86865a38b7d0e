// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Scaling decisions.
//!
//! [`decide`] is a pure function of the desired size and an observed
//! snapshot. It proposes at most one kind of change per pass:
//!
//! - too many available workers: delete the surplus, taking the first ones
//!   in listing order regardless of role
//! - too few: add exactly one worker, flagged as master when no available
//!   worker is the master
//! - otherwise nothing
//!
//! Larger deficits close one worker per pass, so the controller relies on
//! being requeued until the counts match.

use crate::crd::JedyKindSpec;
use crate::observer::{ClusterSnapshot, WorkerRecord};
use std::fmt;

/// Replica target read from the owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DesiredSpec {
    pub size: usize,
}

impl DesiredSpec {
    /// Read the target from an owner spec; negative sizes become zero.
    #[must_use]
    pub fn from_owner(spec: &JedyKindSpec) -> Self {
        Self {
            size: usize::try_from(spec.size).unwrap_or(0),
        }
    }
}

/// Corrective action for one pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScaleAction {
    /// Available workers already match the desired size.
    NoOp,
    /// Delete these workers.
    ScaleDown { victims: Vec<WorkerRecord> },
    /// Create one worker, as master when `add_master` is set.
    ScaleUp { add_master: bool },
}

impl ScaleAction {
    /// Short label for logs and metrics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoOp => "noop",
            Self::ScaleDown { .. } => "scale_down",
            Self::ScaleUp { .. } => "scale_up",
        }
    }

    /// Whether applying this action changes the pool.
    #[must_use]
    pub fn changes_pool(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

impl fmt::Display for ScaleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => write!(f, "no-op"),
            Self::ScaleDown { victims } => {
                let names: Vec<&str> = victims.iter().map(|v| v.name.as_str()).collect();
                write!(f, "scale down [{}]", names.join(", "))
            }
            Self::ScaleUp { add_master: true } => write!(f, "scale up (master)"),
            Self::ScaleUp { add_master: false } => write!(f, "scale up (slave)"),
        }
    }
}

/// Compute the action that moves `snapshot` one step toward `desired`.
#[must_use]
pub fn decide(desired: DesiredSpec, snapshot: &ClusterSnapshot) -> ScaleAction {
    let available = snapshot.available_count;

    if available > desired.size {
        let surplus = available - desired.size;
        let victims = snapshot
            .available_workers()
            .take(surplus)
            .cloned()
            .collect();
        return ScaleAction::ScaleDown { victims };
    }

    if available < desired.size {
        return ScaleAction::ScaleUp {
            add_master: !snapshot.master_present,
        };
    }

    ScaleAction::NoOp
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
