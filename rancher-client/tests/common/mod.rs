//! Common test utilities and helpers

use rancher_client::{RancherClient, RancherConfig, Session};
use rancher_fake::{FakeOptions, FakeRancher, DEFAULT_CLUSTER_NAME};

/// Test environment backed by an in-process fake Rancher
pub struct TestEnv {
    pub fake: FakeRancher,
    pub session: Session,
    pub client: RancherClient,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_options(FakeOptions::default()).await
    }

    pub async fn with_options(options: FakeOptions) -> Self {
        let fake = FakeRancher::start(options)
            .await
            .expect("Failed to start fake Rancher");
        let session = Session::new();
        let client = RancherClient::from_config(config_for(&fake), "", &session)
            .expect("Failed to create client");

        TestEnv {
            fake,
            session,
            client,
        }
    }
}

/// Client configuration pointing at `fake`
pub fn config_for(fake: &FakeRancher) -> RancherConfig {
    RancherConfig::new(fake.base_url())
        .with_token(fake.token())
        .with_cluster_name(DEFAULT_CLUSTER_NAME)
}
