//! Liveness check and router reconciliation.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use ddev_sweep::labels;
use ddev_sweep::router::{any_running, router_status, Router, RuntimeRouter, ROUTER_NOT_RUNNING};

use crate::helpers::{container, db_container, web_container, Call, FakeRuntime};

fn router_container(state: &str) -> ddev_sweep::runtime::ContainerRecord {
    container("r1", "ddev-router", state, &[(labels::SERVICE, "ddev-router")])
}

#[tokio::test]
async fn not_running_without_managed_containers() {
    let runtime = FakeRuntime::new()
        .with_container(container("x", "postgres", "running", &[]))
        .with_container(router_container("running"));
    assert!(!any_running(&runtime).await.expect("any_running"));
}

#[tokio::test]
async fn running_counts_label_presence_not_state() {
    let runtime = FakeRuntime::new().with_container(db_container("d", "site1", "exited"));
    assert!(any_running(&runtime).await.expect("any_running"));
}

#[tokio::test]
async fn running_check_lists_everything() {
    let runtime = FakeRuntime::new();
    any_running(&runtime).await.expect("any_running");
    assert_eq!(runtime.calls(), vec![Call::Find(Vec::new())]);
}

#[tokio::test]
async fn router_kept_while_apps_remain() {
    let runtime = FakeRuntime::new()
        .with_container(web_container("w", "site2", &PathBuf::from("/srv/site2"), "running"))
        .with_container(router_container("running"));

    RuntimeRouter::new(&runtime, "ddev-router", 60)
        .reconcile()
        .await
        .expect("reconcile");
    assert!(runtime.mutations().is_empty());
}

#[tokio::test]
async fn router_removed_when_last_app_is_gone() {
    let runtime = FakeRuntime::new().with_container(router_container("running"));

    RuntimeRouter::new(&runtime, "ddev-router", 30)
        .reconcile()
        .await
        .expect("reconcile");
    assert_eq!(
        runtime.mutations(),
        vec![Call::Stop("r1".to_string(), 30), Call::Remove("r1".to_string())]
    );
    assert!(runtime.container_ids().is_empty());
}

#[tokio::test]
async fn stopped_router_is_only_removed() {
    let runtime = FakeRuntime::new().with_container(router_container("exited"));

    RuntimeRouter::new(&runtime, "ddev-router", 60)
        .reconcile()
        .await
        .expect("reconcile");
    assert_eq!(runtime.mutations(), vec![Call::Remove("r1".to_string())]);
}

#[tokio::test]
async fn no_router_is_fine() {
    let runtime = FakeRuntime::new();
    RuntimeRouter::new(&runtime, "ddev-router", 60)
        .reconcile()
        .await
        .expect("reconcile");
    assert!(runtime.mutations().is_empty());
}

#[tokio::test]
async fn router_stop_failure_surfaces() {
    let runtime = FakeRuntime::new()
        .with_container(router_container("running"))
        .failing_stop("r1");

    let result = RuntimeRouter::new(&runtime, "ddev-router", 60).reconcile().await;
    assert!(result.is_err());
    assert!(!runtime.calls().contains(&Call::Remove("r1".to_string())));
}

#[tokio::test]
async fn status_of_router() {
    let runtime = FakeRuntime::new().with_container(router_container("running"));
    assert_eq!(
        router_status(&runtime, "ddev-router").await.expect("status"),
        "running"
    );
    assert_eq!(
        router_status(&FakeRuntime::new(), "ddev-router")
            .await
            .expect("status"),
        ROUTER_NOT_RUNNING
    );
}
