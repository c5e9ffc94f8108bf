//! Reconciler handler tests against an in-memory UptimeRobot

mod common;

use common::{FakeMonitoringService, FakeSecrets};
use serde_json::{json, Value};
use std::sync::Arc;
use uptimerobot_operator::controller::diff::compute_diff;
use uptimerobot_operator::controller::reconciler::{ReconcilerError, ResourceReconciler};
use uptimerobot_operator::crd::{
    AlertContactSpec, AlertContactType, ExternalBinding, MaintenanceWindowSpec,
    MaintenanceWindowType, MonitorType, ObjectKind, PublicStatusPageSpec, ResourceStatus,
    UptimeRobotMonitorSpec,
};
use uptimerobot_operator::mapper::ExternalSpec;
use uptimerobot_operator::runtime::dispatch::{
    delete_external, essence, plan_event, spec_hash, Plan,
};

fn reconciler<S: ExternalSpec>(
    service: &Arc<FakeMonitoringService>,
    secrets: FakeSecrets,
) -> ResourceReconciler<S> {
    ResourceReconciler::new(service.clone(), Arc::new(secrets))
}

fn bound(kind: ObjectKind, id: &str) -> ResourceStatus {
    ResourceStatus {
        binding: Some(ExternalBinding {
            kind,
            id: id.to_string(),
            spec_hash: String::new(),
            applied: None,
        }),
        ..ResourceStatus::default()
    }
}

fn fail(error_type: &str) -> Value {
    json!({"stat": "fail", "error": {"type": error_type, "message": "rejected by test"}})
}

#[tokio::test]
async fn test_create_monitor_sends_mapped_parameters() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let mut spec = UptimeRobotMonitorSpec::new("https://foo.com", MonitorType::Https);
    spec.interval = Some(600);
    let outcome = reconciler
        .on_create("my-monitor", "default", &spec)
        .await
        .unwrap();

    assert_eq!(outcome.identifier, "1000");
    assert!(!outcome.recreated);

    let calls = service.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "newMonitor");
    assert_eq!(calls[0].parameters.get("friendly_name"), Some(&json!("my-monitor")));
    assert_eq!(calls[0].parameters.get("url"), Some(&json!("https://foo.com")));
    assert_eq!(calls[0].parameters.get("type"), Some(&json!(1)));
    assert_eq!(calls[0].parameters.get("interval"), Some(&json!(600)));
}

#[tokio::test]
async fn test_create_rejection_is_permanent_and_carries_payload() {
    let service = Arc::new(FakeMonitoringService::new());
    service.respond("newMonitor", fail("invalid_parameter"));
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let spec = UptimeRobotMonitorSpec::new("not a url", MonitorType::Http);
    let err = reconciler
        .on_create("broken", "default", &spec)
        .await
        .unwrap_err();

    assert!(err.is_permanent());
    let message = err.to_string();
    assert!(message.starts_with("failed to create monitor: "));
    assert!(message.contains("invalid_parameter"));
}

#[tokio::test]
async fn test_update_edits_monitor_in_place() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let old = UptimeRobotMonitorSpec::new("https://foo.com", MonitorType::Https);
    let mut new = old.clone();
    new.friendly_name = Some("Foo".to_string());
    let diff = compute_diff(&essence(&old).unwrap(), &essence(&new).unwrap());

    let outcome = reconciler
        .on_update("my-monitor", "default", &new, &bound(ObjectKind::Monitor, "777"), &diff)
        .await
        .unwrap();

    assert_eq!(outcome.identifier, "777");
    assert!(!outcome.recreated);
    let calls = service.calls();
    assert_eq!(service.methods(), vec!["editMonitor"]);
    assert_eq!(calls[0].id.as_deref(), Some("777"));
    assert_eq!(calls[0].parameters.get("friendly_name"), Some(&json!("Foo")));
    // Monitors keep their type on edit
    assert_eq!(calls[0].parameters.get("type"), Some(&json!(1)));
}

#[tokio::test]
async fn test_type_change_recreates_monitor() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let old = UptimeRobotMonitorSpec::new("foo.com", MonitorType::Http);
    let mut new = old.clone();
    new.r#type = MonitorType::Ping;
    let diff = compute_diff(&essence(&old).unwrap(), &essence(&new).unwrap());

    let outcome = reconciler
        .on_update("my-monitor", "default", &new, &bound(ObjectKind::Monitor, "777"), &diff)
        .await
        .unwrap();

    assert!(outcome.recreated);
    assert_eq!(outcome.identifier, "1000");
    assert_eq!(service.methods(), vec!["deleteMonitor", "newMonitor"]);
    assert_eq!(service.calls()[1].parameters.get("type"), Some(&json!(3)));
}

#[tokio::test]
async fn test_recreate_tolerates_missing_old_object() {
    let service = Arc::new(FakeMonitoringService::new());
    service.respond("deleteMonitor", fail("not_found"));
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let old = UptimeRobotMonitorSpec::new("foo.com", MonitorType::Http);
    let new = UptimeRobotMonitorSpec::new("foo.com", MonitorType::Ping);
    let diff = compute_diff(&essence(&old).unwrap(), &essence(&new).unwrap());

    let outcome = reconciler
        .on_update("my-monitor", "default", &new, &bound(ObjectKind::Monitor, "777"), &diff)
        .await
        .unwrap();
    assert!(outcome.recreated);
}

#[tokio::test]
async fn test_update_without_identifier_fails_permanently() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let spec = UptimeRobotMonitorSpec::new("foo.com", MonitorType::Ping);
    let err = reconciler
        .on_update("my-monitor", "default", &spec, &ResourceStatus::default(), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, ReconcilerError::MissingIdentifier { .. }));
    assert!(err.is_permanent());
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_update_reads_legacy_identifier() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let status: ResourceStatus =
        serde_json::from_value(json!({"on_create": {"monitor_id": 555}})).unwrap();
    let spec = UptimeRobotMonitorSpec::new("foo.com", MonitorType::Ping);
    let outcome = reconciler
        .on_update("my-monitor", "default", &spec, &status, &[])
        .await
        .unwrap();

    assert_eq!(outcome.identifier, "555");
    assert_eq!(service.calls()[0].id.as_deref(), Some("555"));
}

#[tokio::test]
async fn test_delete_treats_not_found_as_success() {
    let service = Arc::new(FakeMonitoringService::new());
    service.respond("deleteMonitor", fail("not_found"));
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    reconciler
        .on_delete(&bound(ObjectKind::Monitor, "777"))
        .await
        .unwrap();
    assert_eq!(service.methods(), vec!["deleteMonitor"]);
}

#[tokio::test]
async fn test_delete_rejection_is_permanent() {
    let service = Arc::new(FakeMonitoringService::new());
    service.respond("deleteMonitor", fail("internal"));
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let err = reconciler
        .on_delete(&bound(ObjectKind::Monitor, "777"))
        .await
        .unwrap_err();
    assert!(err.is_permanent());
    assert!(err.to_string().starts_with("failed to delete monitor with ID 777: "));
}

#[tokio::test]
async fn test_email_alert_contact_is_recreated_on_update() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<AlertContactSpec>(&service, FakeSecrets::new());

    let spec = AlertContactSpec {
        r#type: AlertContactType::Email,
        value: "new@example.com".to_string(),
        friendly_name: None,
    };
    let outcome = reconciler
        .on_update("ops", "default", &spec, &bound(ObjectKind::AlertContact, "42"), &[])
        .await
        .unwrap();

    assert!(outcome.recreated);
    assert_eq!(service.methods(), vec!["deleteAlertContact", "newAlertContact"]);
    assert_eq!(service.calls()[1].parameters.get("type"), Some(&json!(2)));
}

#[tokio::test]
async fn test_web_hook_alert_contact_is_edited_without_type() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<AlertContactSpec>(&service, FakeSecrets::new());

    let spec = AlertContactSpec {
        r#type: AlertContactType::WebHook,
        value: "https://hooks.example.com/?".to_string(),
        friendly_name: Some("hook".to_string()),
    };
    let outcome = reconciler
        .on_update("ops", "default", &spec, &bound(ObjectKind::AlertContact, "42"), &[])
        .await
        .unwrap();

    assert!(!outcome.recreated);
    let calls = service.calls();
    assert_eq!(service.methods(), vec!["editAlertContact"]);
    assert!(!calls[0].parameters.contains_key("type"));
    assert_eq!(calls[0].parameters.get("friendly_name"), Some(&json!("hook")));
}

#[tokio::test]
async fn test_maintenance_window_edit_strips_type() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<MaintenanceWindowSpec>(&service, FakeSecrets::new());

    let old = MaintenanceWindowSpec {
        r#type: MaintenanceWindowType::Daily,
        start_time: "02:00".to_string(),
        duration: 30,
        friendly_name: None,
        value: None,
    };
    let mut new = old.clone();
    new.duration = 60;
    let diff = compute_diff(&essence(&old).unwrap(), &essence(&new).unwrap());

    reconciler
        .on_update("nightly", "default", &new, &bound(ObjectKind::MaintenanceWindow, "9"), &diff)
        .await
        .unwrap();

    let calls = service.calls();
    assert_eq!(service.methods(), vec!["editMWindow"]);
    assert!(!calls[0].parameters.contains_key("type"));
    assert_eq!(calls[0].parameters.get("duration"), Some(&json!(60)));
    assert_eq!(calls[0].parameters.get("value"), Some(&json!("")));
}

#[tokio::test]
async fn test_status_page_password_comes_from_secret() {
    let service = Arc::new(FakeMonitoringService::new());
    let secrets =
        FakeSecrets::new().with_secret("default", "psp-password", &[("password", "s3cret")]);
    let reconciler = reconciler::<PublicStatusPageSpec>(&service, secrets);

    let spec = PublicStatusPageSpec {
        monitors: "0".to_string(),
        friendly_name: None,
        custom_domain: None,
        password: None,
        password_secret: Some("psp-password".to_string()),
        sort: None,
        status: None,
        hide_url_links: None,
    };
    reconciler.on_create("status", "default", &spec).await.unwrap();

    let calls = service.calls();
    assert_eq!(calls[0].method, "newPSP");
    assert_eq!(calls[0].parameters.get("password"), Some(&json!("s3cret")));
    assert!(!calls[0].parameters.contains_key("password_secret"));
}

#[tokio::test]
async fn test_missing_password_secret_is_transient() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<PublicStatusPageSpec>(&service, FakeSecrets::new());

    let spec = PublicStatusPageSpec {
        monitors: "0".to_string(),
        friendly_name: None,
        custom_domain: None,
        password: None,
        password_secret: Some("not-yet-created".to_string()),
        sort: None,
        status: None,
        hide_url_links: None,
    };
    let err = reconciler
        .on_create("status", "default", &spec)
        .await
        .unwrap_err();

    assert!(!err.is_permanent());
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_type_change_recreates_monitor_after_annotation_loss() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let applied = essence(&UptimeRobotMonitorSpec::new(
        "https://foo.com",
        MonitorType::HttpHttps,
    ))
    .unwrap();
    let mut status = bound(ObjectKind::Monitor, "777");
    if let Some(binding) = status.binding.as_mut() {
        binding.spec_hash = spec_hash(&applied);
        binding.applied = Some(applied.to_string());
    }

    let spec = UptimeRobotMonitorSpec::new("foo.com", MonitorType::Ping);
    let current = essence(&spec).unwrap();
    let Plan::Update(diff) = plan_event::<UptimeRobotMonitorSpec>(None, &current, &status) else {
        panic!("expected an update");
    };
    let outcome = reconciler
        .on_update("my-monitor", "default", &spec, &status, &diff)
        .await
        .unwrap();

    assert!(outcome.recreated);
    assert_eq!(service.methods(), vec!["deleteMonitor", "newMonitor"]);
}

#[tokio::test]
async fn test_delete_without_identifier_still_releases_resource() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let failure = delete_external(&reconciler, &ResourceStatus::default()).await;

    assert!(matches!(
        failure,
        Some(ReconcilerError::MissingIdentifier { .. })
    ));
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_delete_still_releases_resource() {
    let service = Arc::new(FakeMonitoringService::new());
    service.respond("deleteMonitor", fail("internal"));
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let failure = delete_external(&reconciler, &bound(ObjectKind::Monitor, "777")).await;

    assert!(matches!(failure, Some(ReconcilerError::Rejected { .. })));
    assert_eq!(service.methods(), vec!["deleteMonitor"]);
}

#[tokio::test]
async fn test_successful_delete_reports_nothing() {
    let service = Arc::new(FakeMonitoringService::new());
    let reconciler = reconciler::<UptimeRobotMonitorSpec>(&service, FakeSecrets::new());

    let failure = delete_external(&reconciler, &bound(ObjectKind::Monitor, "777")).await;

    assert!(failure.is_none());
    assert_eq!(service.methods(), vec!["deleteMonitor"]);
}
