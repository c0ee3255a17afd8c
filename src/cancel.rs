use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::dispatch::Stage;
use crate::error::DispatchError;

/// Cooperative cancellation flag for one dispatch.
///
/// Clones share the flag, so a serving loop can keep one clone and cancel
/// from another thread (client disconnect, deadline). The dispatcher checks
/// the flag before each stage.
///
/// # Examples
///
/// ```
/// use dispatch_core::CancelToken;
///
/// let token = CancelToken::new();
/// let handle = token.clone();
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub(crate) fn check(&self, stage: Stage) -> Result<(), DispatchError> {
        if self.is_cancelled() {
            Err(DispatchError::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_token_is_live() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert!(token.check(Stage::Initialize).is_ok());
    }

    #[test]
    fn cancellation_is_shared_by_clones() {
        let token = CancelToken::new();
        let clone = token.clone();

        clone.cancel();

        assert_eq!(
            token.check(Stage::Respond),
            Err(DispatchError::Cancelled {
                stage: Stage::Respond
            })
        );
    }

    #[test]
    fn cancel_from_another_thread() {
        let token = CancelToken::new();
        let remote = token.clone();

        std::thread::spawn(move || remote.cancel())
            .join()
            .expect("thread completes");

        assert!(token.is_cancelled());
    }
}
