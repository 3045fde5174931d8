//! Suite setup shared by the validation tests
//!
//! With `CATTLE_TEST_CONFIG` set the suite runs against that Rancher server.
//! Otherwise it starts an in-process fake Rancher.

#![allow(dead_code)]

use futures::FutureExt;
use rancher_client::config::CONFIG_ENV;
use rancher_client::{RancherClient, RancherConfig, Session};
use rancher_common::Cluster;
use rancher_fake::{FakeOptions, FakeRancher, DEFAULT_CLUSTER_NAME};
use rancher_validation::{checks, logging};
use std::future::Future;
use std::panic::AssertUnwindSafe;

pub struct SecretTestSuite {
    pub fake: Option<FakeRancher>,
    pub session: Session,
    pub client: RancherClient,
    pub cluster: Cluster,
}

impl SecretTestSuite {
    pub async fn setup_suite() -> Self {
        logging::init_for_tests();

        let session = Session::new();
        let live = std::env::var(CONFIG_ENV).is_ok_and(|path| !path.is_empty());

        let (fake, client) = if live {
            let client = RancherClient::new("", &session).expect("Failed to create client from test config");
            (None, client)
        } else {
            let fake = FakeRancher::start(FakeOptions::default())
                .await
                .expect("Failed to start fake Rancher");
            let client =
                RancherClient::from_config(fake_config(&fake), "", &session).expect("Failed to create client");
            (Some(fake), client)
        };

        let cluster = checks::resolve_cluster(&client)
            .await
            .expect("Failed to resolve the configured cluster");

        SecretTestSuite {
            fake,
            session,
            client,
            cluster,
        }
    }

    pub async fn teardown_suite(self) {
        self.session.cleanup().await;
    }

    /// Run `test` with a client bound to a sub-session.
    ///
    /// The sub-session is cleaned up even when `test` panics, then the panic resumes.
    pub async fn with_sub_session<F, Fut>(&self, test: F)
    where
        F: FnOnce(RancherClient) -> Fut,
        Fut: Future<Output = ()>,
    {
        let sub_session = self.session.new_session();
        let client = self.client.with_session(&sub_session);

        let outcome = AssertUnwindSafe(test(client)).catch_unwind().await;
        sub_session.cleanup().await;

        if let Err(panic) = outcome {
            std::panic::resume_unwind(panic);
        }
    }
}

/// Configuration pointing at `fake` with its token and default cluster
pub fn fake_config(fake: &FakeRancher) -> RancherConfig {
    RancherConfig::new(fake.base_url())
        .with_token(fake.token())
        .with_cluster_name(DEFAULT_CLUSTER_NAME)
}
