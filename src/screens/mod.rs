//! Screen controllers. Each owns its view state, issues gateway calls through
//! its own [`ScreenScope`], and reduces the outcome into that state.

pub mod coach;
pub mod food;
pub mod forgot_password;
pub mod home;
pub mod onboarding;
pub mod profile;
pub mod progress;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, ApiResult};

/// Progress of the one outstanding request a screen may have.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncOp<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(ApiError),
}

impl<T> Default for AsyncOp<T> {
    fn default() -> Self {
        AsyncOp::Idle
    }
}

impl<T> AsyncOp<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, AsyncOp::Pending)
    }

    /// Moves to `Pending`. Refuses while a request is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = AsyncOp::Pending;
        true
    }

    /// Records the outcome. A cancelled request leaves no trace.
    pub fn settle(&mut self, result: ApiResult<T>) {
        *self = match result {
            Ok(v) => AsyncOp::Succeeded(v),
            Err(ApiError::Cancelled) => AsyncOp::Idle,
            Err(e) => AsyncOp::Failed(e),
        };
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            AsyncOp::Succeeded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            AsyncOp::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Lifetime of a screen. Closing it (or dropping it) cancels whatever is in
/// flight; late results come back as [`ApiError::Cancelled`].
#[derive(Debug, Default)]
pub struct ScreenScope {
    token: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the host keeps to tear the screen down from elsewhere.
    pub fn handle(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn run<T, F>(&self, fut: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        if self.is_closed() {
            return Err(ApiError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ApiError::Cancelled),
            result = fut => result,
        }
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn begin_refuses_double_submit() {
        let mut op: AsyncOp<u32> = AsyncOp::default();
        assert!(op.begin());
        assert!(!op.begin());
        op.settle(Ok(7));
        assert_eq!(op.value(), Some(&7));
        assert!(op.begin());
    }

    #[test]
    fn cancelled_settles_to_idle() {
        let mut op: AsyncOp<u32> = AsyncOp::Pending;
        op.settle(Err(ApiError::Cancelled));
        assert_eq!(op, AsyncOp::Idle);
        op.settle(Err(ApiError::NotFound("x".into())));
        assert!(op.error().is_some());
    }

    #[tokio::test]
    async fn closing_discards_a_pending_call() {
        let scope = ScreenScope::new();
        let handle = scope.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });
        let result: ApiResult<u32> = scope.run(std::future::pending()).await;
        assert_eq!(result, Err(ApiError::Cancelled));
        assert!(scope.is_closed());
    }

    #[tokio::test]
    async fn closed_scope_never_polls() {
        let scope = ScreenScope::new();
        scope.close();
        let result = scope.run(async { Ok::<_, ApiError>(1) }).await;
        assert_eq!(result, Err(ApiError::Cancelled));
    }
}
