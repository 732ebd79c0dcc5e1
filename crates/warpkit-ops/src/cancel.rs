//! Cooperative cancellation for long-running passes.
//!
//! Engines poll the token once per output scanline. A cancelled call
//! returns [`OpsError::Cancelled`] and drops its partial output.
//!
//! # Example
//!
//! ```rust
//! use warpkit_ops::CancelToken;
//!
//! let token = CancelToken::new();
//! let handle = token.clone();
//! assert!(!token.is_cancelled());
//! handle.cancel();
//! assert!(token.is_cancelled());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{OpsError, OpsResult};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Fails with [`OpsError::Cancelled`] if cancellation was requested.
    #[inline]
    pub(crate) fn check(&self) -> OpsResult<()> {
        if self.is_cancelled() {
            Err(OpsError::Cancelled)
        } else {
            Ok(())
        }
    }
}
