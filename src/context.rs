// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for the `JedyKind` controller.
//!
//! Every reconcile pass receives an `Arc<Context>` that contains:
//! - the resource store used to read owners and manage workers
//! - the token source for worker name suffixes
//! - the controller configuration
//!
//! Passes for distinct owners may run concurrently and share one context;
//! neither the store nor the token source holds per-owner state.

use crate::config::ControllerConfig;
use crate::store::{KubeStore, PoolStore};
use crate::tokens::{SeededTokenSource, TokenSource};
use kube::Client;
use std::sync::Arc;

/// Shared context passed to every reconcile pass.
#[derive(Clone)]
pub struct Context {
    /// Access to owners, worker pods and endpoint services
    pub store: Arc<dyn PoolStore>,

    /// Source of worker-group suffixes
    pub tokens: Arc<dyn TokenSource>,

    /// Controller configuration
    pub config: ControllerConfig,
}

impl Context {
    #[must_use]
    pub fn new(
        store: Arc<dyn PoolStore>,
        tokens: Arc<dyn TokenSource>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            store,
            tokens,
            config,
        }
    }

    /// Context backed by the Kubernetes API.
    ///
    /// Suffixes are drawn from a generator seeded with OS entropy on every
    /// start, so a restarted controller never replays names of live workers.
    #[must_use]
    pub fn from_client(client: Client, config: ControllerConfig) -> Self {
        let store = KubeStore::new(client, config.field_manager.clone());
        Self::new(Arc::new(store), runtime_token_source(), config)
    }
}

/// Suffix generator used outside tests.
#[must_use]
pub fn runtime_token_source() -> Arc<dyn TokenSource> {
    Arc::new(SeededTokenSource::from_entropy())
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
