// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Label keys and values carried by every worker and endpoint.
//!
//! These labels are wire-visible: the observer selects workers with them and
//! endpoints select their worker group with them, so they must never change
//! between releases.

// ============================================================================
// Pool Labels
// ============================================================================

/// Label holding the name of the owning `JedyKind`
pub const APP_LABEL: &str = "app";

/// Label holding the generated worker-group suffix
pub const INTERNAL_SERVICE_LABEL: &str = "internal_service";

/// Label holding the master flag (`"true"` or `"false"`)
pub const IS_MASTER_LABEL: &str = "isMaster";

// ============================================================================
// Label Values
// ============================================================================

/// Master flag value for the elected master
pub const IS_MASTER_TRUE: &str = "true";

/// Master flag value for every other worker
pub const IS_MASTER_FALSE: &str = "false";

// ============================================================================
// Role Values
// ============================================================================

/// Role segment used in master worker names
pub const ROLE_MASTER: &str = "master";

/// Role segment used in slave worker names
pub const ROLE_SLAVE: &str = "slave";

/// Infix used in endpoint names
pub const ENDPOINT_INFIX: &str = "service";

/// Label selector string matching every worker of an owner (`app=<owner>`).
#[must_use]
pub fn owner_selector(owner_name: &str) -> String {
    format!("{APP_LABEL}={owner_name}")
}

/// Master flag label value for a boolean.
#[must_use]
pub fn master_flag(is_master: bool) -> &'static str {
    if is_master {
        IS_MASTER_TRUE
    } else {
        IS_MASTER_FALSE
    }
}

/// Role name segment for a boolean master flag.
#[must_use]
pub fn role_name(is_master: bool) -> &'static str {
    if is_master {
        ROLE_MASTER
    } else {
        ROLE_SLAVE
    }
}
