// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Jedy - worker pool controller for Kubernetes
//!
//! Jedy keeps the number of worker pods owned by a `JedyKind` resource at
//! its declared `size`, with one worker labelled as master and the others as
//! slaves. Each worker gets a discovery `Service` of its own.
//!
//! ## Overview
//!
//! A reconcile pass is a straight line:
//!
//! - [`observer`] lists the owner's pods and summarises the available ones
//! - [`engine`] compares that snapshot with the desired size and picks one action
//! - [`executor`] applies the action, using [`factory`] and [`worker_resources`]
//!   to build new workers and endpoints
//! - [`reconcilers`] ties the steps together and reports status
//!
//! All access to the API server goes through the [`store::PoolStore`] trait.
//!
//! ## Example
//!
//! ```rust,no_run
//! use jedy::engine::{decide, DesiredSpec, ScaleAction};
//! use jedy::observer::ClusterSnapshot;
//!
//! let snapshot = ClusterSnapshot::empty("cache1");
//! let action = decide(DesiredSpec { size: 3 }, &snapshot);
//! assert_eq!(action, ScaleAction::ScaleUp { add_master: true });
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod crd;
pub mod engine;
pub mod errors;
pub mod executor;
pub mod factory;
pub mod labels;
pub mod metrics;
pub mod observer;
pub mod pagination;
pub mod reconcilers;
pub mod status_reasons;
pub mod store;
pub mod tokens;
pub mod worker_resources;

#[cfg(test)]
pub(crate) mod test_support;
