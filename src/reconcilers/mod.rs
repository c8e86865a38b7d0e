// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes reconciliation for worker pools.
//!
//! # Reconciliation Architecture
//!
//! Every pass follows the same steps:
//!
//! 1. **Fetch** - Re-read the `JedyKind`; a missing owner ends the pass
//! 2. **Observe** - List the owner's worker pods and summarise them
//! 3. **Decide** - Compare the desired size with the available workers
//! 4. **Execute** - Create one worker (and its endpoint) or delete the surplus
//! 5. **Status** - Report counts and the `Ready` condition back to Kubernetes
//!
//! A pass changes the pool by at most one step; the controller requeues it
//! until a pass finds nothing to do.
//!
//! # Example
//!
//! ```rust,no_run
//! use jedy::context::Context;
//! use jedy::reconcilers::reconcile_jedykind;
//!
//! async fn run_once(ctx: &Context) -> anyhow::Result<()> {
//!     let outcome = reconcile_jedykind(ctx, "default", "cache1").await?;
//!     println!("requeue: {}", outcome.requeue);
//!     Ok(())
//! }
//! ```

pub mod jedykind;
pub mod status;

pub use jedykind::{reconcile_jedykind, ReconcileOutcome};

/// Check if a status value has actually changed compared to the current status.
///
/// Status writes trigger watch events for the owner, so unchanged values
/// must not be written back or every pass schedules another one.
#[must_use]
pub fn status_changed<T: PartialEq>(current_value: &Option<T>, new_value: &Option<T>) -> bool {
    current_value != new_value
}
