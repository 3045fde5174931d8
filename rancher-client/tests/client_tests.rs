//! Client tests against the in-process fake Rancher
//!
//! Run with: cargo test -p rancher-client --test client_tests

mod common;

use common::{config_for, TestEnv};
use rancher_client::extensions::{clusters, secrets};
use rancher_client::{ClientError, ListParams, RancherClient, Session};
use rancher_common::{Cluster, ObjectMeta, Secret, SteveResource};
use rancher_fake::FakeOptions;

fn demo_secret(name: &str) -> Secret {
    let mut meta = ObjectMeta::namespaced("default", name);
    meta.labels.insert("app".to_string(), "client-tests".to_string());
    Secret::opaque(meta).with_data("foo", "bar")
}

#[tokio::test]
async fn test_secret_lifecycle() {
    let env = TestEnv::new().await;
    let secret_client = env.client.steve().steve_type(Secret::STEVE_TYPE);

    // 1. Create
    let created = secret_client.create(&demo_secret("lifecycle")).await.unwrap();
    assert_eq!(created.id, "default/lifecycle");
    assert_eq!(created.type_, "secret");

    // 2. Get
    let fetched = secret_client.by_id(&created.id).await.unwrap();
    let typed: Secret = fetched.to_typed().unwrap();
    assert_eq!(typed.data.get("foo").unwrap().as_bytes(), b"bar");
    assert_eq!(typed.type_.as_deref(), Some("Opaque"));

    // 3. Update
    let mut changed = fetched.clone();
    changed
        .metadata
        .annotations
        .insert("anno1".to_string(), "changed".to_string());
    let updated = secret_client.update(&fetched, &changed).await.unwrap();
    assert_eq!(updated.metadata.annotations.get("anno1").unwrap(), "changed");
    assert_ne!(updated.metadata.resource_version, fetched.metadata.resource_version);

    // 4. Delete
    secret_client.delete(&updated).await.unwrap();

    // Verify deleted
    let err = secret_client.by_id(&created.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("not found"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_session_cleanup_deletes_created_objects() {
    let env = TestEnv::new().await;
    let sub_session = env.session.new_session();
    let client = env.client.with_session(&sub_session);
    let secret_client = client.steve().steve_type(Secret::STEVE_TYPE);

    secret_client.create(&demo_secret("tracked-a")).await.unwrap();
    secret_client.create(&demo_secret("tracked-b")).await.unwrap();
    assert_eq!(env.fake.object_count("secret").await, 2);
    assert_eq!(sub_session.pending(), 2);

    assert_eq!(sub_session.cleanup().await, 0);
    assert_eq!(env.fake.object_count("secret").await, 0);

    // The root session still holds the (now empty) child
    assert_eq!(env.session.cleanup().await, 0);
}

#[tokio::test]
async fn test_cleanup_tolerates_deleted_objects() {
    let env = TestEnv::new().await;
    let secret_client = env.client.steve().steve_type(Secret::STEVE_TYPE);

    let created = secret_client.create(&demo_secret("deleted")).await.unwrap();
    secret_client.delete(&created).await.unwrap();

    assert_eq!(env.session.cleanup().await, 0);
}

#[tokio::test]
async fn test_cleanup_disabled_keeps_objects() {
    let fake = rancher_fake::FakeRancher::start(FakeOptions::default()).await.unwrap();
    let mut config = config_for(&fake);
    config.cleanup = false;

    let session = Session::new();
    let client = RancherClient::from_config(config, "", &session).unwrap();
    client
        .steve()
        .steve_type(Secret::STEVE_TYPE)
        .create(&demo_secret("kept"))
        .await
        .unwrap();

    session.cleanup().await;
    assert_eq!(fake.object_count("secret").await, 1);
}

#[tokio::test]
async fn test_delete_uses_remove_link() {
    let env = TestEnv::new().await;
    let secret_client = env.client.steve().steve_type(Secret::STEVE_TYPE);

    let created = secret_client.create(&demo_secret("linked")).await.unwrap();
    assert!(created.link("remove").is_some());
    secret_client.delete(&created).await.unwrap();

    let requests = env.fake.requests().await;
    let delete = requests.iter().find(|r| r.method == "DELETE").unwrap();
    assert_eq!(delete.path, "/v1/secret/default/linked");
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let env = TestEnv::new().await;
    let session = Session::new();
    let client = RancherClient::from_config(config_for(&env.fake), "token-wrong:nope", &session).unwrap();

    let err = client
        .steve()
        .steve_type(Secret::STEVE_TYPE)
        .by_id("default/anything")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AuthFailed(_)));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_stale_update_conflicts() {
    let env = TestEnv::new().await;
    let secret_client = env.client.steve().steve_type(Secret::STEVE_TYPE);

    let created = secret_client.create(&demo_secret("stale")).await.unwrap();
    let mut first = created.clone();
    first.metadata.labels.insert("round".to_string(), "1".to_string());
    secret_client.update(&created, &first).await.unwrap();

    let mut second = created.clone();
    second.metadata.labels.insert("round".to_string(), "2".to_string());
    let err = secret_client.update(&created, &second).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert!(matches!(err, ClientError::Api { ref code, .. } if code == "Conflict"));
}

#[tokio::test]
async fn test_duplicate_create_is_rejected() {
    let env = TestEnv::new().await;
    let secret_client = env.client.steve().steve_type(Secret::STEVE_TYPE);

    secret_client.create(&demo_secret("dup")).await.unwrap();
    let err = secret_client.create(&demo_secret("dup")).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 409, ref code, .. } if code == "AlreadyExists"));
}

#[tokio::test]
async fn test_list_with_label_selector() {
    let env = TestEnv::new().await;
    let secret_client = env.client.steve().steve_type(Secret::STEVE_TYPE);

    secret_client.create(&demo_secret("listed")).await.unwrap();
    let unlabelled = Secret::opaque(ObjectMeta::namespaced("default", "unlabelled"));
    secret_client.create(&unlabelled).await.unwrap();

    let all = secret_client.list(&ListParams::default()).await.unwrap();
    assert_eq!(all.data.len(), 2);

    let labelled = secret_client
        .list(&ListParams::labels("app=client-tests"))
        .await
        .unwrap();
    assert_eq!(labelled.data.len(), 1);
    assert_eq!(labelled.data[0].name(), "listed");

    let other_ns = secret_client
        .list_namespaced("kube-system", &ListParams::default())
        .await
        .unwrap();
    assert!(other_ns.data.is_empty());
}

#[tokio::test]
async fn test_secret_extensions() {
    let env = TestEnv::new().await;

    let created = secrets::create_secret(&env.client, &demo_secret("typed")).await.unwrap();
    assert_eq!(created.metadata.name(), "typed");
    assert!(created.metadata.uid.is_some());

    let fetched = secrets::get_secret(&env.client, "default", "typed").await.unwrap();
    assert_eq!(fetched.data, created.data);

    let listed = secrets::list_secrets(&env.client, "default", "app=client-tests").await.unwrap();
    assert_eq!(listed.len(), 1);

    let missing = secrets::get_secret(&env.client, "default", "missing").await.unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn test_cluster_lookup() {
    let options = FakeOptions {
        clusters: vec![Cluster::new("local", "local"), Cluster::new("c-m-abc12", "downstream")],
        ..Default::default()
    };
    let env = TestEnv::with_options(options).await;

    let id = clusters::get_cluster_id_by_name(&env.client, "downstream").await.unwrap();
    assert_eq!(id, "c-m-abc12");

    let cluster = env.client.management().clusters().by_id(&id).await.unwrap();
    assert_eq!(cluster.name, "downstream");
    assert!(cluster.is_active());

    let err = clusters::get_cluster_id_by_name(&env.client, "missing").await.unwrap_err();
    assert!(err.is_not_found());

    let err = env.client.management().clusters().by_id("c-m-nope").await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}
