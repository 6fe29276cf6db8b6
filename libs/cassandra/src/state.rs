use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether session bootstrap has completed.
///
/// Two states, one legal transition: not-initialized to initialized. The flag
/// is flipped exactly when the underlying session becomes usable and is never
/// reset. The producer side holds the `Arc<SessionState>`; consumers only see
/// a [`SessionStateView`].
pub struct SessionState {
    initialized: AtomicBool,
}

impl SessionState {
    /// Construct state in the initial, not-initialized condition
    pub fn not_initialized() -> Arc<Self> {
        Arc::new(Self {
            initialized: AtomicBool::new(false),
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Mark bootstrap as complete. Idempotent; there is no reverse transition.
    pub fn set_initialized(&self) {
        self.initialized.store(true, Ordering::Release);
    }
}

/// Read-only view of a [`SessionState`], handed to consumers
#[derive(Clone)]
pub struct SessionStateView {
    state: Arc<SessionState>,
}

impl SessionStateView {
    pub fn new(state: Arc<SessionState>) -> Self {
        Self { state }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }
}
