// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared fixtures for unit tests: owner and pod builders and an in-memory
//! [`PoolStore`] that records calls and injects failures.

use crate::crd::{JedyKind, JedyKindSpec, JedyKindStatus};
use crate::errors::PoolError;
use crate::constants::{WORKER_SUFFIX_ALPHABET, WORKER_SUFFIX_LENGTH};
use crate::factory::worker_name;
use crate::labels::{master_flag, APP_LABEL, INTERNAL_SERVICE_LABEL, IS_MASTER_LABEL};
use crate::store::PoolStore;
use crate::tokens::TokenSource;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Pod, PodStatus, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use kube::ResourceExt;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

/// A `JedyKind` as the API server would return it.
pub fn test_owner(namespace: &str, name: &str, size: i32) -> JedyKind {
    let mut owner = JedyKind::new(name, JedyKindSpec { size, image: None });
    owner.metadata.namespace = Some(namespace.to_string());
    owner.metadata.uid = Some(format!("uid-{name}"));
    owner.metadata.generation = Some(1);
    owner
}

/// A worker pod of `owner` with the given suffix, role and phase.
pub fn test_pod(
    namespace: &str,
    owner: &str,
    suffix: &str,
    is_master: bool,
    phase: Option<&str>,
) -> Pod {
    let name = worker_name(owner, is_master, suffix);
    let labels = BTreeMap::from([
        (APP_LABEL.to_string(), owner.to_string()),
        (INTERNAL_SERVICE_LABEL.to_string(), suffix.to_string()),
        (IS_MASTER_LABEL.to_string(), master_flag(is_master).to_string()),
    ]);

    Pod {
        metadata: ObjectMeta {
            uid: Some(format!("uid-{name}")),
            name: Some(name),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        spec: None,
        status: Some(PodStatus {
            phase: phase.map(ToString::to_string),
            pod_ip: Some("10.0.0.1".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Mark a pod for deletion.
pub fn terminating(mut pod: Pod) -> Pod {
    let ts: Time = serde_json::from_value(serde_json::json!("2025-01-01T00:00:00Z"))
        .expect("valid RFC3339 timestamp");
    pod.metadata.deletion_timestamp = Some(ts);
    pod
}

fn injected(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(
        kube::core::Status::failure(&format!("injected {reason}"), reason)
            .with_code(code)
            .boxed(),
    )
}

/// Hands out a fixed list of suffixes in order. Once the list is exhausted
/// the n-th call returns `z` followed by n in base 26 (`a` = 0).
pub struct SequenceTokenSource {
    tokens: Mutex<VecDeque<String>>,
    issued: Mutex<usize>,
}

impl SequenceTokenSource {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Mutex::new(tokens.into_iter().map(Into::into).collect()),
            issued: Mutex::new(0),
        }
    }
}

impl TokenSource for SequenceTokenSource {
    fn next_token(&self) -> String {
        let mut issued = self.issued.lock().unwrap();
        *issued += 1;

        if let Some(token) = self.tokens.lock().unwrap().pop_front() {
            return token;
        }

        let base = WORKER_SUFFIX_ALPHABET.len();
        let mut n = *issued;
        let mut digits = vec![WORKER_SUFFIX_ALPHABET[0]; WORKER_SUFFIX_LENGTH - 1];
        for slot in digits.iter_mut().rev() {
            *slot = WORKER_SUFFIX_ALPHABET[n % base];
            n /= base;
        }

        std::iter::once('z')
            .chain(digits.into_iter().map(char::from))
            .collect()
    }
}

#[derive(Default)]
struct Inner {
    owners: Vec<JedyKind>,
    pods: Vec<Pod>,
    services: Vec<Service>,
    calls: Vec<String>,
    status_updates: Vec<JedyKindStatus>,
    deletes: usize,
    fail_owner_read: bool,
    fail_list: bool,
    fail_create_worker: bool,
    fail_create_endpoint: bool,
    fail_delete_after: Option<usize>,
    fail_status: bool,
}

/// In-memory [`PoolStore`].
///
/// Pods are listed in insertion order. Created pods start in phase
/// `Pending` so they count as available on the next observation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn insert_owner(&self, owner: JedyKind) {
        let mut inner = self.lock();
        inner
            .owners
            .retain(|o| !(o.name_any() == owner.name_any() && o.namespace() == owner.namespace()));
        inner.owners.push(owner);
    }

    pub fn set_size(&self, namespace: &str, name: &str, size: i32) {
        let mut inner = self.lock();
        for owner in &mut inner.owners {
            if owner.name_any() == name && owner.namespace().as_deref() == Some(namespace) {
                owner.spec.size = size;
                owner.metadata.generation = owner.metadata.generation.map(|g| g + 1);
            }
        }
    }

    pub fn owner(&self, namespace: &str, name: &str) -> Option<JedyKind> {
        self.lock()
            .owners
            .iter()
            .find(|o| o.name_any() == name && o.namespace().as_deref() == Some(namespace))
            .cloned()
    }

    pub fn insert_pod(&self, pod: Pod) {
        self.lock().pods.push(pod);
    }

    pub fn pods(&self) -> Vec<Pod> {
        self.lock().pods.clone()
    }

    pub fn services(&self) -> Vec<Service> {
        self.lock().services.clone()
    }

    /// Mutating calls in the order they were made.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn status_updates(&self) -> Vec<JedyKindStatus> {
        self.lock().status_updates.clone()
    }

    pub fn fail_owner_read(&self) {
        self.lock().fail_owner_read = true;
    }

    pub fn fail_list(&self) {
        self.lock().fail_list = true;
    }

    pub fn fail_create_worker(&self) {
        self.lock().fail_create_worker = true;
    }

    pub fn fail_create_endpoint(&self) {
        self.lock().fail_create_endpoint = true;
    }

    /// Let `n` deletions succeed, then fail every later one.
    pub fn fail_delete_after(&self, n: usize) {
        self.lock().fail_delete_after = Some(n);
    }

    pub fn fail_status(&self) {
        self.lock().fail_status = true;
    }

    pub fn clear_failures(&self) {
        let mut inner = self.lock();
        inner.fail_owner_read = false;
        inner.fail_list = false;
        inner.fail_create_worker = false;
        inner.fail_create_endpoint = false;
        inner.fail_delete_after = None;
        inner.fail_status = false;
    }
}

#[async_trait]
impl PoolStore for MemoryStore {
    async fn get_owner(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<JedyKind>, PoolError> {
        if self.lock().fail_owner_read {
            return Err(PoolError::OwnerRead {
                namespace: namespace.to_string(),
                name: name.to_string(),
                source: injected(500, "InternalError"),
            });
        }
        Ok(self.owner(namespace, name))
    }

    async fn list_workers(
        &self,
        namespace: &str,
        owner_name: &str,
    ) -> Result<Vec<Pod>, PoolError> {
        let inner = self.lock();
        if inner.fail_list {
            return Err(PoolError::List {
                owner: format!("{namespace}/{owner_name}"),
                source: injected(503, "ServiceUnavailable"),
            });
        }

        Ok(inner
            .pods
            .iter()
            .filter(|p| {
                p.namespace().as_deref() == Some(namespace)
                    && p.labels().get(APP_LABEL).map(String::as_str) == Some(owner_name)
            })
            .cloned()
            .collect())
    }

    async fn create_worker(&self, pod: &Pod) -> Result<(), PoolError> {
        let mut inner = self.lock();
        inner.calls.push(format!("create_worker {}", pod.name_any()));
        if inner.fail_create_worker {
            return Err(PoolError::Create {
                kind: "Pod",
                name: pod.name_any(),
                source: injected(500, "InternalError"),
            });
        }

        let mut created = pod.clone();
        created.metadata.uid = Some(format!("uid-{}", pod.name_any()));
        created.status = Some(PodStatus {
            phase: Some("Pending".to_string()),
            ..Default::default()
        });
        inner.pods.push(created);
        Ok(())
    }

    async fn delete_worker(&self, namespace: &str, name: &str) -> Result<(), PoolError> {
        let mut inner = self.lock();
        inner.calls.push(format!("delete_worker {name}"));
        if inner.fail_delete_after.is_some_and(|n| inner.deletes >= n) {
            return Err(PoolError::Delete {
                kind: "Pod",
                name: name.to_string(),
                source: injected(500, "InternalError"),
            });
        }

        inner.deletes += 1;
        inner
            .pods
            .retain(|p| !(p.name_any() == name && p.namespace().as_deref() == Some(namespace)));
        Ok(())
    }

    async fn create_endpoint(&self, service: &Service) -> Result<(), PoolError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(format!("create_endpoint {}", service.name_any()));
        if inner.fail_create_endpoint {
            return Err(PoolError::Create {
                kind: "Service",
                name: service.name_any(),
                source: injected(500, "InternalError"),
            });
        }

        inner.services.push(service.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        namespace: &str,
        name: &str,
        status: &JedyKindStatus,
    ) -> Result<(), PoolError> {
        let mut inner = self.lock();
        if inner.fail_status {
            return Err(PoolError::StatusUpdate {
                owner: format!("{namespace}/{name}"),
                source: injected(409, "Conflict"),
            });
        }

        inner.status_updates.push(status.clone());
        for owner in &mut inner.owners {
            if owner.name_any() == name && owner.namespace().as_deref() == Some(namespace) {
                owner.status = Some(status.clone());
            }
        }
        Ok(())
    }
}
