// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Definitions for new workers and their endpoints.
//!
//! Everything here returns values only; [`crate::executor`] turns them into
//! API objects and creates them.

use crate::constants::{DISCOVERY_PORT, DISCOVERY_PROTOCOL, WORKER_TARGET_PORT};
use crate::labels::{master_flag, role_name, ENDPOINT_INFIX};
use crate::observer::{WorkerLabels, WorkerPhase, WorkerRecord};
use crate::tokens::TokenSource;

/// Discovery endpoint for one worker group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointRecord {
    pub name: String,
    pub namespace: String,
    /// Owner name, carried as the `app` label.
    pub app: String,
    /// Worker-group suffix the endpoint selects on.
    pub selector_suffix: String,
    pub port: i32,
    pub target_port: i32,
    pub protocol: String,
}

/// Name of a worker: `<owner>-<role>-<suffix>`.
#[must_use]
pub fn worker_name(owner_id: &str, is_master: bool, suffix: &str) -> String {
    format!("{owner_id}-{}-{suffix}", role_name(is_master))
}

/// Name of an endpoint: `<owner>-service-<suffix>`.
#[must_use]
pub fn endpoint_name(owner_id: &str, suffix: &str) -> String {
    format!("{owner_id}-{ENDPOINT_INFIX}-{suffix}")
}

/// Define a new worker with a freshly drawn suffix.
///
/// The suffix changes on every call, so asking twice yields two distinct
/// workers rather than a conflicting duplicate.
#[must_use]
pub fn build_worker(
    owner_id: &str,
    owner_namespace: &str,
    is_master: bool,
    tokens: &dyn TokenSource,
) -> WorkerRecord {
    let suffix = tokens.next_token();

    WorkerRecord {
        id: String::new(),
        name: worker_name(owner_id, is_master, &suffix),
        namespace: owner_namespace.to_string(),
        labels: WorkerLabels {
            app: owner_id.to_string(),
            internal_service: suffix,
            is_master: master_flag(is_master).to_string(),
        },
        phase: WorkerPhase::Pending,
        address: None,
    }
}

/// Define the endpoint paired with the worker group `suffix`.
#[must_use]
pub fn build_endpoint(owner_id: &str, owner_namespace: &str, suffix: &str) -> EndpointRecord {
    EndpointRecord {
        name: endpoint_name(owner_id, suffix),
        namespace: owner_namespace.to_string(),
        app: owner_id.to_string(),
        selector_suffix: suffix.to_string(),
        port: DISCOVERY_PORT,
        target_port: WORKER_TARGET_PORT,
        protocol: DISCOVERY_PROTOCOL.to_string(),
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod factory_tests;
