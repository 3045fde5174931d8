//! Secret helpers

use crate::error::{ClientError, Result};
use crate::steve::{ListParams, SteveTypeClient};
use crate::RancherClient;
use rancher_common::{Secret, SteveResource};

/// Steve resource type of secrets
pub const SECRET_STEVE_TYPE: &str = Secret::STEVE_TYPE;

pub fn secret_client(client: &RancherClient) -> SteveTypeClient {
    client.steve().steve_type(SECRET_STEVE_TYPE)
}

/// Create `secret` and return the stored copy
pub async fn create_secret(client: &RancherClient, secret: &Secret) -> Result<Secret> {
    let created = secret_client(client).create(secret).await?;
    Ok(created.into_typed()?)
}

pub async fn get_secret(client: &RancherClient, namespace: &str, name: &str) -> Result<Secret> {
    let object = secret_client(client)
        .by_id(&format!("{}/{}", namespace, name))
        .await?;
    Ok(object.into_typed()?)
}

/// Secrets in `namespace` matching `label_selector`
pub async fn list_secrets(
    client: &RancherClient,
    namespace: &str,
    label_selector: &str,
) -> Result<Vec<Secret>> {
    let collection = secret_client(client)
        .list_namespaced(namespace, &ListParams::labels(label_selector))
        .await?;

    collection
        .data
        .into_iter()
        .map(|object| object.into_typed().map_err(ClientError::from))
        .collect()
}
