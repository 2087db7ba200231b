//! 環境コントローラーのエンドツーエンドテスト

mod common;

use common::{APPLYING, NOTIFICATION_TTL, PLANNING, controller, settle};
use mcpenv::{
    Change, ConfigUpdate, Error, EventKind, LifecycleStatus, NetworkConfig, Provider, RunOutcome,
    ValidationError,
};
use serde_json::json;
use std::time::Duration;

#[test]
fn test_default_document() {
    let env = controller();
    let doc = env.document().to_json_value().unwrap();

    assert_eq!(doc["apiVersion"], "mcp/v1");
    assert_eq!(doc["kind"], "Environment");
    assert_eq!(doc["metadata"]["name"], "mcp-demo");
    assert_eq!(doc["spec"]["provider"], "aws");
    assert_eq!(doc["spec"]["network"]["publicSubnets"], 2);
    assert_eq!(doc["metadata"]["tags"]["managed-by"], "mcpenv");
}

#[test]
fn test_spec_tracks_config_after_edits() {
    let mut env = controller();
    env.update(ConfigUpdate::Provider(Provider::Gcp)).unwrap();
    env.update_field("region", json!("europe-west1")).unwrap();
    env.update_field("loadBalancer", json!({ "exposure": "private" }))
        .unwrap();
    env.update_tag("team", "platform").unwrap();

    assert_eq!(env.revision(), 4);
    assert_eq!(env.document().spec, *env.config());
    assert_eq!(env.document().metadata.tags, env.config().tags);

    let preview: serde_json::Value = serde_json::from_str(&env.preview_json().unwrap()).unwrap();
    assert_eq!(preview["spec"]["region"], "europe-west1");
    assert_eq!(preview["spec"]["loadBalancer"]["exposure"], "private");
}

#[test]
fn test_out_of_range_subnets_rejected() {
    let mut env = controller();
    let before = env.preview_json().unwrap();

    let err = env
        .update_field(
            "network",
            json!({ "cidr": "10.0.0.0/16", "publicSubnets": 7, "privateSubnets": 2 }),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::OutOfRange { .. })
    ));
    assert_eq!(env.preview_json().unwrap(), before);
    assert_eq!(env.revision(), 0);
}

#[test]
fn test_tag_update_is_idempotent() {
    let mut env = controller();
    assert!(env.update_tag("cost-center", "42").unwrap().is_applied());
    assert_eq!(env.update_tag("cost-center", "42").unwrap(), Change::Unchanged);
    assert_eq!(env.tags().len(), 3);
}

#[test]
fn test_yaml_export() {
    let mut env = controller();
    env.update(ConfigUpdate::Network(NetworkConfig {
        public_subnets: 3,
        ..NetworkConfig::default()
    }))
    .unwrap();

    let yaml = env.export_yaml().unwrap();
    assert!(yaml.contains("apiVersion: mcp/v1"));
    assert!(yaml.contains("publicSubnets: 3"));
}

#[tokio::test(start_paused = true)]
async fn test_provision_then_destroy() {
    let env = controller();
    let mut events = env.subscribe();

    let run = env.provision().unwrap().unwrap();
    assert_eq!(env.status(), LifecycleStatus::Planning);
    assert!(env.provision().unwrap().is_none());
    assert!(env.destroy().unwrap().is_none());

    assert_eq!(
        run.wait().await.unwrap(),
        RunOutcome::Completed {
            status: LifecycleStatus::Deployed
        }
    );

    let run = env.destroy().unwrap().unwrap();
    run.wait().await.unwrap();
    assert_eq!(env.status(), LifecycleStatus::Idle);

    let mut kinds = Vec::new();
    while let Ok(event) = events.try_recv() {
        kinds.push(event.kind);
    }
    assert_eq!(
        kinds,
        vec![
            EventKind::ProvisioningStarted,
            EventKind::ApplyingPlan,
            EventKind::EnvironmentDeployed,
            EventKind::DestroyingStarted,
            EventKind::AllDestroyed,
            EventKind::Reset,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_editing_during_run_does_not_disturb_it() {
    let mut env = controller();
    let mut watch = env.lifecycle().watch();

    let run = env.provision().unwrap().unwrap();
    watch
        .wait_for(|s| s.status == LifecycleStatus::Applying)
        .await
        .unwrap();

    env.update_field("name", json!("edited-mid-run")).unwrap();
    assert_eq!(env.status(), LifecycleStatus::Applying);

    run.wait().await.unwrap();
    assert_eq!(env.status(), LifecycleStatus::Deployed);
    assert_eq!(env.document().metadata.name, "edited-mid-run");
}

#[tokio::test(start_paused = true)]
async fn test_notifications_follow_lifecycle() {
    let env = controller();

    let run = env.provision().unwrap().unwrap();
    tokio::time::sleep(PLANNING / 2).await;
    let titles: Vec<_> = env.notifications().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Provisioning started"]);

    run.wait().await.unwrap();
    settle().await;
    let kinds: Vec<_> = env.notifications().into_iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::ProvisioningStarted,
            EventKind::ApplyingPlan,
            EventKind::EnvironmentDeployed,
        ]
    );

    // 最初の2件は最後の通知より PLANNING + APPLYING 早く表示されている
    tokio::time::sleep(NOTIFICATION_TTL - APPLYING + Duration::from_millis(10)).await;
    let kinds: Vec<_> = env.notifications().into_iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![EventKind::EnvironmentDeployed]);

    tokio::time::sleep(NOTIFICATION_TTL).await;
    assert!(env.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reprovision_after_destroyed() {
    let env = controller();
    env.provision().unwrap().unwrap().wait().await.unwrap();

    let mut watch = env.lifecycle().watch();
    let destroy = env.destroy().unwrap().unwrap();
    watch
        .wait_for(|s| s.status == LifecycleStatus::Destroyed)
        .await
        .unwrap();

    let provision = env.provision().unwrap().unwrap();
    assert_eq!(
        destroy.wait().await.unwrap(),
        RunOutcome::Superseded {
            last: LifecycleStatus::Destroyed
        }
    );
    provision.wait().await.unwrap();
    assert_eq!(env.status(), LifecycleStatus::Deployed);
}
