//! Ingress fan-out tests against an in-memory monitor store

mod common;

use common::{FakeMonitorStore, StoreCall};
use k8s_openapi::api::networking::v1::Ingress;
use serde_json::json;
use std::sync::Arc;
use uptimerobot_operator::controller::ingress::{Route, RouteSynchronizer};
use uptimerobot_operator::crd::MonitorType;
use uptimerobot_operator::runtime::dispatch::{plan_route, RoutePlan};

fn ingress(hosts: &[Option<&str>], annotations: serde_json::Value) -> Ingress {
    let rules: Vec<_> = hosts
        .iter()
        .map(|host| match host {
            Some(host) => json!({"host": host}),
            None => json!({}),
        })
        .collect();
    serde_json::from_value(json!({
        "apiVersion": "networking.k8s.io/v1",
        "kind": "Ingress",
        "metadata": {
            "name": "web",
            "namespace": "shop",
            "uid": "6f1c2a8e-0000-4000-8000-000000000001",
            "annotations": annotations,
        },
        "spec": {"rules": rules},
    }))
    .unwrap()
}

fn synchronizer(store: &Arc<FakeMonitorStore>, enabled: bool) -> RouteSynchronizer {
    RouteSynchronizer::new(store.clone(), enabled)
}

fn names(calls: &[StoreCall]) -> Vec<String> {
    calls
        .iter()
        .map(|call| match call {
            StoreCall::Create { name, .. } => format!("create {name}"),
            StoreCall::Update { name, .. } => format!("update {name}"),
            StoreCall::Delete { name } => format!("delete {name}"),
        })
        .collect()
}

#[tokio::test]
async fn test_create_adds_one_monitor_per_eligible_host() {
    let store = Arc::new(FakeMonitorStore::new());
    let route = Route::from_ingress(&ingress(
        &[Some("foo.com"), Some("*.wild.com"), None, Some("bar.com")],
        json!({}),
    ));

    let report = synchronizer(&store, true).on_create(&route).await.unwrap();

    assert_eq!(report.created, vec!["web-0", "web-1"]);
    let calls = store.calls();
    assert_eq!(names(&calls), vec!["create web-0", "create web-1"]);
    let StoreCall::Create { spec, .. } = &calls[1] else {
        panic!("expected a create");
    };
    assert_eq!(spec.r#type, MonitorType::Ping);
    assert_eq!(spec.url, "bar.com");
}

#[tokio::test]
async fn test_annotations_seed_every_child() {
    let store = Arc::new(FakeMonitorStore::new());
    let route = Route::from_ingress(&ingress(
        &[Some("foo.com"), Some("bar.com")],
        json!({
            "uroperator.brennerm.github.io/monitor.type": "HTTPS",
            "uroperator.brennerm.github.io/monitor.interval": "600",
            "uroperator.brennerm.github.io/monitor.notAField": "ignored",
            "kubernetes.io/ingress.class": "nginx",
        }),
    ));

    synchronizer(&store, true).on_create(&route).await.unwrap();

    for (call, host) in store.calls().iter().zip(["foo.com", "bar.com"]) {
        let StoreCall::Create { spec, .. } = call else {
            panic!("expected a create");
        };
        assert_eq!(spec.r#type, MonitorType::Https);
        assert_eq!(spec.url, format!("https://{host}"));
        assert_eq!(spec.interval, Some(600));
    }
}

#[tokio::test]
async fn test_children_are_owned_by_the_ingress() {
    let store = Arc::new(FakeMonitorStore::new());
    let route = Route::from_ingress(&ingress(&[Some("foo.com")], json!({})));

    let children = synchronizer(&store, true).build_children(&route).unwrap();

    let owners = children[0].metadata.owner_references.clone().unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].kind, "Ingress");
    assert_eq!(owners[0].name, "web");
    assert_eq!(owners[0].controller, Some(true));
    assert_eq!(children[0].metadata.namespace.as_deref(), Some("shop"));
}

#[tokio::test]
async fn test_growing_rules_updates_existing_and_creates_new() {
    let store = Arc::new(FakeMonitorStore::new());
    let previous = Route::from_ingress(&ingress(&[Some("foo.com")], json!({})));
    let current = Route::from_ingress(&ingress(
        &[Some("foo.com"), Some("bar.com"), Some("baz.com")],
        json!({}),
    ));

    let RoutePlan::Update { previous_count } =
        plan_route(Some(&previous.essence()), &current.essence())
    else {
        panic!("expected an update");
    };
    let report = synchronizer(&store, true)
        .on_update(&current, previous_count)
        .await
        .unwrap();

    assert_eq!(report.updated, vec!["web-0"]);
    assert_eq!(report.created, vec!["web-1", "web-2"]);
    assert!(report.deleted.is_empty());
}

#[tokio::test]
async fn test_shrinking_rules_deletes_surplus_children() {
    let store = Arc::new(FakeMonitorStore::new());
    let current = Route::from_ingress(&ingress(&[Some("foo.com")], json!({})));

    synchronizer(&store, true)
        .on_update(&current, 3)
        .await
        .unwrap();

    assert_eq!(
        names(&store.calls()),
        vec!["update web-0", "delete web-1", "delete web-2"]
    );
}

#[tokio::test]
async fn test_wildcards_do_not_count_as_previous_children() {
    let previous = Route::from_ingress(&ingress(
        &[Some("*.wild.com"), Some("foo.com"), None],
        json!({}),
    ));
    let current = Route::from_ingress(&ingress(&[Some("foo.com")], json!({})));

    assert_eq!(
        plan_route(Some(&previous.essence()), &current.essence()),
        RoutePlan::Update { previous_count: 1 }
    );
}

#[tokio::test]
async fn test_annotation_change_alone_triggers_update() {
    let previous = Route::from_ingress(&ingress(&[Some("foo.com")], json!({})));
    let current = Route::from_ingress(&ingress(
        &[Some("foo.com")],
        json!({"uroperator.brennerm.github.io/monitor.interval": "300"}),
    ));

    assert_eq!(
        plan_route(Some(&previous.essence()), &current.essence()),
        RoutePlan::Update { previous_count: 1 }
    );
    assert_eq!(
        plan_route(Some(&current.essence()), &current.essence()),
        RoutePlan::Unchanged
    );
}

#[tokio::test]
async fn test_disabled_synchronizer_writes_nothing() {
    let store = Arc::new(FakeMonitorStore::new());
    let route = Route::from_ingress(&ingress(&[Some("foo.com")], json!({})));
    let sync = synchronizer(&store, false);

    assert!(!sync.is_enabled());
    assert!(sync.on_create(&route).await.unwrap().created.is_empty());
    assert!(sync.on_update(&route, 2).await.unwrap().deleted.is_empty());
    assert!(store.calls().is_empty());
}
