// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `jedykind.rs`

#[cfg(test)]
mod tests {
    use super::super::reconcile_jedykind;
    use crate::config::ControllerConfig;
    use crate::context::Context;
    use crate::engine::ScaleAction;
    use crate::test_support::{
        terminating, test_owner, test_pod, MemoryStore, SequenceTokenSource,
    };
    use kube::ResourceExt;
    use std::sync::Arc;

    fn context(store: &Arc<MemoryStore>, tokens: &[&str]) -> Context {
        Context::new(
            store.clone(),
            Arc::new(SequenceTokenSource::new(tokens.iter().copied())),
            ControllerConfig::default(),
        )
    }

    fn pod_names(store: &MemoryStore) -> Vec<String> {
        store.pods().iter().map(ResourceExt::name_any).collect()
    }

    fn master_count(store: &MemoryStore) -> usize {
        store
            .pods()
            .iter()
            .filter(|p| p.labels().get("isMaster").map(String::as_str) == Some("true"))
            .count()
    }

    #[tokio::test]
    async fn test_scale_up_then_down_walkthrough() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 3));
        let ctx = context(&store, &["aaaaa", "bbbbb", "ccccc"]);

        let first = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();
        assert!(first.requeue);
        assert_eq!(first.action, Some(ScaleAction::ScaleUp { add_master: true }));

        let second = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();
        assert_eq!(second.action, Some(ScaleAction::ScaleUp { add_master: false }));

        let third = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();
        assert!(third.requeue);

        let fourth = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();
        assert!(!fourth.requeue);
        assert_eq!(fourth.action, Some(ScaleAction::NoOp));

        assert_eq!(
            pod_names(&store),
            vec![
                "cache1-master-aaaaa",
                "cache1-slave-bbbbb",
                "cache1-slave-ccccc"
            ]
        );
        let services: Vec<String> = store.services().iter().map(ResourceExt::name_any).collect();
        assert_eq!(
            services,
            vec![
                "cache1-service-aaaaa",
                "cache1-service-bbbbb",
                "cache1-service-ccccc"
            ]
        );

        // Lowering the size removes the first available workers in listing
        // order; the master gets no special protection.
        store.set_size("default", "cache1", 1);
        let shrink = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();
        assert!(shrink.requeue);
        match shrink.action {
            Some(ScaleAction::ScaleDown { victims }) => {
                let names: Vec<&str> = victims.iter().map(|v| v.name.as_str()).collect();
                assert_eq!(names, vec!["cache1-master-aaaaa", "cache1-slave-bbbbb"]);
            }
            other => panic!("expected scale down, got {other:?}"),
        }
        assert_eq!(pod_names(&store), vec!["cache1-slave-ccccc"]);

        // Count matches, so no new master is elected.
        let settled = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();
        assert_eq!(settled.action, Some(ScaleAction::NoOp));
        assert_eq!(master_count(&store), 0);
    }

    #[tokio::test]
    async fn test_converges_from_empty_in_size_plus_one_passes() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache5", 5));
        let ctx = context(&store, &[]);

        let mut passes = 0;
        loop {
            passes += 1;
            let outcome = reconcile_jedykind(&ctx, "default", "cache5").await.unwrap();
            if !outcome.requeue {
                break;
            }
            assert!(passes < 10, "pool did not converge");
        }

        assert_eq!(passes, 6);
        assert_eq!(store.pods().len(), 5);
        assert_eq!(store.services().len(), 5);
        assert_eq!(master_count(&store), 1);
    }

    #[tokio::test]
    async fn test_missing_owner_ends_pass_without_requeue() {
        let store = Arc::new(MemoryStore::new());
        let ctx = context(&store, &[]);

        let outcome = reconcile_jedykind(&ctx, "default", "gone").await.unwrap();

        assert!(!outcome.requeue);
        assert_eq!(outcome.action, None);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_owner_read_error_is_returned() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 1));
        store.fail_owner_read();
        let ctx = context(&store, &[]);

        let err = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap_err();

        assert_eq!(err.metric_label(), "owner_read_error");
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_list_error_skips_action() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 3));
        store.fail_list();
        let ctx = context(&store, &[]);

        let err = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap_err();

        assert_eq!(err.metric_label(), "list_error");
        assert!(store.calls().is_empty());
        assert!(store.status_updates().is_empty());
    }

    #[tokio::test]
    async fn test_endpoint_failure_leaves_unrepaired_worker() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 1));
        store.fail_create_endpoint();
        let ctx = context(&store, &["aaaaa"]);

        let err = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap_err();
        assert_eq!(err.metric_label(), "create_error");
        assert_eq!(store.pods().len(), 1);

        store.clear_failures();
        let outcome = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();

        assert_eq!(outcome.action, Some(ScaleAction::NoOp));
        assert!(store.services().is_empty(), "Missing endpoints are not recreated");
    }

    #[tokio::test]
    async fn test_converged_pool_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 2));
        store.insert_pod(test_pod("default", "cache1", "aaaaa", true, Some("Running")));
        store.insert_pod(test_pod("default", "cache1", "bbbbb", false, Some("Running")));
        let ctx = context(&store, &[]);

        for _ in 0..3 {
            let outcome = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();
            assert!(!outcome.requeue);
        }

        assert!(store.calls().is_empty());
        assert_eq!(store.status_updates().len(), 1, "Unchanged status is written once");

        let status = store.owner("default", "cache1").unwrap().status.unwrap();
        assert_eq!(status.available_workers, Some(2));
        assert_eq!(status.master_present, Some(true));
        assert_eq!(status.conditions[0].reason.as_deref(), Some("Converged"));
    }

    #[tokio::test]
    async fn test_terminating_master_is_replaced_by_a_new_master() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 2));
        store.insert_pod(terminating(test_pod(
            "default",
            "cache1",
            "aaaaa",
            true,
            Some("Running"),
        )));
        store.insert_pod(test_pod("default", "cache1", "bbbbb", false, Some("Running")));
        let ctx = context(&store, &["ccccc"]);

        let outcome = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();

        assert_eq!(outcome.action, Some(ScaleAction::ScaleUp { add_master: true }));
        assert!(pod_names(&store).contains(&"cache1-master-ccccc".to_string()));
    }

    #[tokio::test]
    async fn test_failed_workers_do_not_count() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 1));
        store.insert_pod(test_pod("default", "cache1", "aaaaa", true, Some("Failed")));
        let ctx = context(&store, &["bbbbb"]);

        let outcome = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();

        assert_eq!(outcome.action, Some(ScaleAction::ScaleUp { add_master: true }));
    }

    #[tokio::test]
    async fn test_negative_size_scales_to_zero() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", -2));
        store.insert_pod(test_pod("default", "cache1", "aaaaa", true, Some("Running")));
        let ctx = context(&store, &[]);

        let outcome = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();

        assert!(outcome.requeue);
        assert!(store.pods().is_empty());
    }

    #[tokio::test]
    async fn test_status_failure_does_not_fail_pass() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 1));
        store.fail_status();
        let ctx = context(&store, &["aaaaa"]);

        let outcome = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();

        assert!(outcome.requeue);
        assert_eq!(store.pods().len(), 1);
    }

    #[tokio::test]
    async fn test_other_owners_workers_are_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.insert_owner(test_owner("default", "cache1", 1));
        store.insert_pod(test_pod("default", "cache2", "zzzzz", true, Some("Running")));
        store.insert_pod(test_pod("other", "cache1", "yyyyy", true, Some("Running")));
        let ctx = context(&store, &["aaaaa"]);

        let outcome = reconcile_jedykind(&ctx, "default", "cache1").await.unwrap();

        assert_eq!(outcome.action, Some(ScaleAction::ScaleUp { add_master: true }));
    }
}
