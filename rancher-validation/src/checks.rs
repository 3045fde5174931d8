//! Secret CRUD checks
//!
//! The same create/update/delete validations the test suite performs, as
//! functions returning errors instead of panicking, for the CLI runner.

use crate::secrets::{
    get_secret_labels_and_annotations, new_secret_template, secret_labels, updated_annotations,
};
use anyhow::{ensure, Context, Result};
use rancher_client::extensions::{clusters, secrets::SECRET_STEVE_TYPE};
use rancher_client::{wait, RancherClient};
use rancher_common::Cluster;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Outcome of one check
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub check: String,
    pub secret: String,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Create,
    Update,
    Delete,
}

impl Check {
    pub const ALL: [Check; 3] = [Check::Create, Check::Update, Check::Delete];

    pub fn name(&self) -> &'static str {
        match self {
            Check::Create => "secret-create",
            Check::Update => "secret-update",
            Check::Delete => "secret-delete",
        }
    }
}

/// Resolve the configured cluster the way the suite setup does
pub async fn resolve_cluster(client: &RancherClient) -> Result<Cluster> {
    let cluster_name = client.rancher_config.cluster_name.clone();
    ensure!(!cluster_name.is_empty(), "Cluster name to install should be set");

    let cluster_id = clusters::get_cluster_id_by_name(client, &cluster_name)
        .await
        .context("Error getting cluster ID")?;

    client
        .management()
        .clusters()
        .by_id(&cluster_id)
        .await
        .with_context(|| format!("Error getting cluster {}", cluster_id))
}

/// Run `f` with a client bound to a fresh sub-session, then clean the sub-session up
async fn in_sub_session<F, Fut, T>(client: &RancherClient, f: F) -> Result<T>
where
    F: FnOnce(RancherClient) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let sub_session = client.session().new_session();
    let result = f(client.with_session(&sub_session)).await;

    let failures = sub_session.cleanup().await;
    if failures > 0 {
        tracing::warn!(failures, "Sub-session cleanup reported failures");
    }

    result
}

/// Create a secret and validate its name and labels. Returns the secret ID.
pub async fn check_secret_create(client: &RancherClient) -> Result<String> {
    in_sub_session(client, |client| async move {
        let secret = new_secret_template();
        let secret_name = secret.metadata.name().to_string();

        tracing::info!("Creating a secret");
        let secret_obj = client
            .steve()
            .steve_type(SECRET_STEVE_TYPE)
            .create(&secret)
            .await
            .context("Failed to create secret")?;

        tracing::info!("Validating secret was created with correct resource values");
        let labels = get_secret_labels_and_annotations(&secret_obj.metadata.labels);
        ensure!(
            secret_name.contains(secret_obj.name()),
            "Created secret name {:?} does not match {:?}",
            secret_obj.name(),
            secret_name
        );
        ensure!(labels == secret_obj.metadata.labels, "Secret labels changed while copying");
        ensure!(
            secret_labels()
                .iter()
                .all(|(k, v)| secret_obj.metadata.labels.get(k) == Some(v)),
            "Secret labels {:?} are missing {:?}",
            secret_obj.metadata.labels,
            secret_labels()
        );

        Ok(secret_obj.id)
    })
    .await
}

/// Create a secret, replace its annotations and validate the update. Returns the secret ID.
pub async fn check_secret_update(client: &RancherClient) -> Result<String> {
    in_sub_session(client, |client| async move {
        let secret_client = client.steve().steve_type(SECRET_STEVE_TYPE);
        let new_annotations = updated_annotations();

        tracing::info!("Creating a secret");
        let secret_obj = secret_client
            .create(&new_secret_template())
            .await
            .context("Failed to create secret")?;

        tracing::info!("Updating the secret");
        let mut new_secret = secret_obj.clone();
        new_secret.metadata.annotations = new_annotations.clone();
        let updated_secret_obj = secret_client
            .update(&secret_obj, &new_secret)
            .await
            .context("Failed to update secret")?;

        tracing::info!("Validating secret was properly updated");
        let expected_annotations =
            get_secret_labels_and_annotations(&updated_secret_obj.metadata.annotations);
        ensure!(
            expected_annotations == new_annotations,
            "Updated annotations {:?} do not match {:?}",
            expected_annotations,
            new_annotations
        );

        Ok(updated_secret_obj.id)
    })
    .await
}

/// Create a secret, delete it and validate it is gone. Returns the secret ID.
pub async fn check_secret_delete(client: &RancherClient, timeout: Duration) -> Result<String> {
    in_sub_session(client, |client| async move {
        let secret_client = client.steve().steve_type(SECRET_STEVE_TYPE);

        tracing::info!("Creating a secret");
        let secret_obj = secret_client
            .create(&new_secret_template())
            .await
            .context("Failed to create secret")?;

        tracing::info!("Deleting the secret");
        secret_client
            .delete(&secret_obj)
            .await
            .context("Failed to delete secret")?;

        tracing::info!("Validating secret was deleted");
        let lookup = &secret_client;
        let id = secret_obj.id.as_str();
        wait::poll_until("secret deletion", wait::DEFAULT_INTERVAL, timeout, move || async move {
            match lookup.by_id(id).await {
                Ok(_) => Ok(false),
                Err(e) if e.is_not_found() => Ok(true),
                Err(e) => Err(e),
            }
        })
        .await
        .context("Secret is still present after delete")?;

        match secret_client.by_id(id).await {
            Ok(found) => anyhow::bail!("Secret {} still exists", found.id),
            Err(e) => {
                ensure!(
                    e.to_string().contains("not found"),
                    "Unexpected error looking up deleted secret: {}",
                    e
                );
            }
        }

        Ok(secret_obj.id.clone())
    })
    .await
}

pub async fn run_check(client: &RancherClient, check: Check, delete_timeout: Duration) -> CheckReport {
    let result = match check {
        Check::Create => check_secret_create(client).await,
        Check::Update => check_secret_update(client).await,
        Check::Delete => check_secret_delete(client, delete_timeout).await,
    };

    match result {
        Ok(secret) => {
            tracing::info!(check = check.name(), %secret, "Check passed");
            CheckReport {
                check: check.name().to_string(),
                secret,
                passed: true,
                detail: String::new(),
            }
        }
        Err(e) => {
            let detail = format!("{:#}", e);
            tracing::error!(check = check.name(), error = %detail, "Check failed");
            CheckReport {
                check: check.name().to_string(),
                secret: String::new(),
                passed: false,
                detail,
            }
        }
    }
}

/// Run `checks` in order
pub async fn run_checks(client: &RancherClient, checks: &[Check], delete_timeout: Duration) -> Vec<CheckReport> {
    let mut reports = Vec::with_capacity(checks.len());
    for check in checks {
        reports.push(run_check(client, *check, delete_timeout).await);
    }
    reports
}
