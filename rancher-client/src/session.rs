//! Resource-tracking sessions
//!
//! A session queues cleanup functions for the resources created through it.
//! `cleanup()` runs them newest first. Child sessions created with
//! `new_session()` are themselves registered on the parent, so cleaning up
//! a suite-level session also releases anything a test forgot.

use crate::error::{ClientError, Result};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session is closed")]
    Closed,
    #[error("{0} cleanup function(s) failed")]
    CleanupFailed(usize),
}

type CleanupFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

struct SessionInner {
    queue: Vec<CleanupFn>,
    open: bool,
    cleanup_enabled: bool,
}

#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionInner>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("Session")
            .field("pending", &inner.queue.len())
            .field("open", &inner.open)
            .field("cleanup_enabled", &inner.cleanup_enabled)
            .finish()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_cleanup(true)
    }

    /// A session that only runs its cleanup functions when `enabled`
    pub fn with_cleanup(enabled: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                queue: Vec::new(),
                open: true,
                cleanup_enabled: enabled,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop tracking resources. Sessions created afterwards inherit the setting.
    pub fn disable_cleanup(&self) {
        let mut inner = self.lock();
        inner.cleanup_enabled = false;
        inner.queue.clear();
    }

    pub fn cleanup_enabled(&self) -> bool {
        self.lock().cleanup_enabled
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Number of queued cleanup functions
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn register_cleanup<F, Fut>(&self, f: F) -> std::result::Result<(), SessionError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let mut inner = self.lock();
        if !inner.open {
            return Err(SessionError::Closed);
        }
        if inner.cleanup_enabled {
            inner.queue.push(Box::new(move || f().boxed()));
        }
        Ok(())
    }

    /// Create a child session cleaned up together with this one
    pub fn new_session(&self) -> Session {
        let child = Session::with_cleanup(self.cleanup_enabled());
        let tracked = child.clone();

        let registered = self.register_cleanup(move || async move {
            match tracked.cleanup().await {
                0 => Ok(()),
                failed => Err(ClientError::from(SessionError::CleanupFailed(failed))),
            }
        });
        if registered.is_err() {
            tracing::warn!("Parent session is closed, child session is tracked on its own");
        }

        child
    }

    /// Run queued cleanup functions newest first and close the session.
    ///
    /// Failures are logged and counted. Calling this again is a no-op.
    pub async fn cleanup(&self) -> usize {
        let queue = {
            let mut inner = self.lock();
            inner.open = false;
            std::mem::take(&mut inner.queue)
        };

        let mut failures = 0;
        for cleanup in queue.into_iter().rev() {
            if let Err(e) = cleanup().await {
                tracing::warn!(error = %e, "Session cleanup failed");
                failures += 1;
            }
        }

        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn push(log: &Arc<Mutex<Vec<&'static str>>>, session: &Session, label: &'static str) {
        let log = log.clone();
        session
            .register_cleanup(move || async move {
                log.lock().unwrap().push(label);
                Ok(())
            })
            .unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_runs_newest_first() {
        let log = recorder();
        let session = Session::new();
        push(&log, &session, "first");
        push(&log, &session, "second");
        push(&log, &session, "third");

        assert_eq!(session.pending(), 3);
        assert_eq!(session.cleanup().await, 0);
        assert_eq!(*log.lock().unwrap(), vec!["third", "second", "first"]);
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_cleanup_is_idempotent() {
        let log = recorder();
        let session = Session::new();
        push(&log, &session, "only");

        session.cleanup().await;
        session.cleanup().await;
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_session_rejects_registration() {
        let session = Session::new();
        session.cleanup().await;

        let result = session.register_cleanup(|| async { Ok(()) });
        assert!(matches!(result, Err(SessionError::Closed)));
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_propagated() {
        let log = recorder();
        let session = Session::new();
        push(&log, &session, "before");
        session
            .register_cleanup(|| async { Err(ClientError::NotFound("gone".to_string())) })
            .unwrap();
        push(&log, &session, "after");

        assert_eq!(session.cleanup().await, 1);
        assert_eq!(*log.lock().unwrap(), vec!["after", "before"]);
    }

    #[tokio::test]
    async fn test_parent_cleans_up_child() {
        let log = recorder();
        let parent = Session::new();
        push(&log, &parent, "parent");

        let child = parent.new_session();
        push(&log, &child, "child");

        parent.cleanup().await;
        assert_eq!(*log.lock().unwrap(), vec!["child", "parent"]);
        assert!(!child.is_open());
    }

    #[tokio::test]
    async fn test_child_cleaned_first_is_not_run_twice() {
        let log = recorder();
        let parent = Session::new();
        let child = parent.new_session();
        push(&log, &child, "child");

        child.cleanup().await;
        assert_eq!(parent.cleanup().await, 0);
        assert_eq!(*log.lock().unwrap(), vec!["child"]);
    }

    #[tokio::test]
    async fn test_disabled_cleanup_discards_registrations() {
        let log = recorder();
        let session = Session::new();
        session.disable_cleanup();
        push(&log, &session, "skipped");

        let child = session.new_session();
        assert!(!child.cleanup_enabled());
        push(&log, &child, "skipped too");

        assert_eq!(session.pending(), 0);
        session.cleanup().await;
        assert!(log.lock().unwrap().is_empty());
    }
}
