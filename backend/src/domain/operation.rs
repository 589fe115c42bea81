//! Per-operation cancellation and deadline.
//!
//! Every persistent and cache store call made by the orchestrator runs through
//! [`OperationContext::run`]. HTTP handlers hold an
//! [`OperationContext::cancel_on_drop`] guard, so when actix drops a handler
//! future for a disconnected client the token fires and every clone of the
//! context, including work spawned off the handler, stops at its next store
//! boundary. An elapsed request budget has the same effect.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Why a store call did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Interrupted {
    #[error("operation was cancelled")]
    Cancelled,
    #[error("operation deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation token plus optional deadline shared by one logical operation.
///
/// Cloning is cheap; clones observe the same token.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use profile_backend::domain::{Interrupted, OperationContext};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let ctx = OperationContext::with_timeout(Duration::from_secs(1));
/// assert_eq!(ctx.run(async { 7 }).await, Ok(7));
///
/// ctx.cancel();
/// assert_eq!(ctx.run(async { 7 }).await, Err(Interrupted::Cancelled));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperationContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OperationContext {
    /// Context with neither deadline nor external cancellation.
    pub fn background() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Guard that cancels this context when dropped.
    ///
    /// Hold it for the lifetime of the request that owns the context.
    #[must_use = "the context is cancelled as soon as the guard is dropped"]
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    /// Cancel all calls sharing this context.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` to completion unless the context is cancelled or its
    /// deadline passes first. Cancellation wins ties.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(Interrupted::Cancelled),
            () = deadline => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}
