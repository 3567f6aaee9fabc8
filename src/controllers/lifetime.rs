use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::Result;

/// Liveness flag shared between a controller and its in-flight requests.
///
/// Ending the lifetime cancels pending requests and makes any late outcome a
/// no-op.
#[derive(Debug, Clone)]
pub struct Lifetime {
    ended: Arc<watch::Sender<bool>>,
}

impl Lifetime {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { ended: Arc::new(tx) }
    }

    pub fn end(&self) {
        self.ended.send_replace(true);
    }

    pub fn is_ended(&self) -> bool {
        *self.ended.borrow()
    }

    /// Resolves once `end` has been called
    pub async fn ended(&self) {
        let mut rx = self.ended.subscribe();
        let _ = rx.wait_for(|ended| *ended).await;
    }

    /// Run a request bounded by `timeout`. Returns `None` if the lifetime ended
    /// before the request finished.
    pub async fn guard<T, F>(&self, timeout: Duration, request: F) -> Option<Result<T>>
    where
        F: Future<Output = Result<T>>,
    {
        let outcome = tokio::select! {
            biased;
            _ = self.ended() => return None,
            outcome = tokio::time::timeout(timeout, request) => outcome,
        };

        if self.is_ended() {
            return None;
        }

        Some(match outcome {
            Ok(result) => result,
            Err(elapsed) => Err(elapsed.into()),
        })
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}
