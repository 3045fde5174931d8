//! Rancher API client
//!
//! Typed access to the Norman management API (`/v3`) and the Steve
//! Kubernetes API (`/v1`) of a Rancher server, with session based
//! cleanup of everything created through the client.

pub mod config;
pub mod error;
pub mod extensions;
pub mod management;
pub mod session;
pub mod steve;
pub mod transport;
pub mod wait;

pub use config::{ConfigError, RancherConfig};
pub use error::{ClientError, Result};
pub use management::ManagementClient;
pub use session::{Session, SessionError};
pub use steve::{ListParams, SteveClient, SteveTypeClient};

use transport::Transport;

/// Rancher API client
#[derive(Clone)]
pub struct RancherClient {
    pub rancher_config: RancherConfig,
    transport: Transport,
    session: Session,
}

impl std::fmt::Debug for RancherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RancherClient")
            .field("url", &self.transport.base_url().as_str())
            .field("cluster_name", &self.rancher_config.cluster_name)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl RancherClient {
    /// Create a client from the `CATTLE_TEST_CONFIG` configuration.
    ///
    /// An empty `bearer_token` falls back to the configured admin token.
    pub fn new(bearer_token: &str, session: &Session) -> Result<Self> {
        let config = RancherConfig::load()?;
        Self::from_config(config, bearer_token, session)
    }

    pub fn from_config(config: RancherConfig, bearer_token: &str, session: &Session) -> Result<Self> {
        let token = if bearer_token.is_empty() {
            config
                .admin_token
                .clone()
                .filter(|t| !t.is_empty())
                .ok_or(ConfigError::MissingField("adminToken"))?
        } else {
            bearer_token.to_string()
        };

        if !config.cleanup {
            tracing::info!("Cleanup disabled by configuration, created resources will be kept");
            session.disable_cleanup();
        }

        let transport = Transport::new(&config.base_url(), config.insecure)?.with_token(&token)?;
        tracing::debug!(url = %transport.base_url(), "Created Rancher client");

        Ok(Self {
            rancher_config: config,
            transport,
            session: session.clone(),
        })
    }

    /// Same client, tracking created resources on `session`
    pub fn with_session(&self, session: &Session) -> Self {
        Self {
            rancher_config: self.rancher_config.clone(),
            transport: self.transport.clone(),
            session: session.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn management(&self) -> ManagementClient {
        ManagementClient::new(self.transport.clone())
    }

    pub fn steve(&self) -> SteveClient {
        SteveClient::new(self.transport.clone(), self.session.clone())
    }
}
