// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Name tokens for worker groups.
//!
//! Every worker and its endpoint share a short alphabetic suffix. The source
//! of those suffixes is injected so that names are reproducible in tests.
//! The running controller always seeds from OS entropy.

use crate::constants::{WORKER_SUFFIX_ALPHABET, WORKER_SUFFIX_LENGTH};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Mutex;

/// Source of worker-group suffixes.
///
/// Implementations must be safe to share between concurrent passes for
/// distinct owners.
pub trait TokenSource: Send + Sync {
    /// Draw the next suffix.
    fn next_token(&self) -> String;
}

/// Random suffixes of [`WORKER_SUFFIX_LENGTH`] letters drawn from
/// [`WORKER_SUFFIX_ALPHABET`].
pub struct SeededTokenSource {
    rng: Mutex<StdRng>,
}

impl SeededTokenSource {
    /// Deterministic source: the same seed yields the same sequence of suffixes.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Source seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl TokenSource for SeededTokenSource {
    fn next_token(&self) -> String {
        // A poisoned lock only means another pass panicked mid-draw; the rng state is still usable.
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        (0..WORKER_SUFFIX_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..WORKER_SUFFIX_ALPHABET.len());
                char::from(WORKER_SUFFIX_ALPHABET[idx])
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tokens_tests.rs"]
mod tokens_tests;
