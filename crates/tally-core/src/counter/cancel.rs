use std::cell::Cell;
use std::rc::Rc;

/// Invalidation flag shared between a running loop and its owner
///
/// Cancelling is permanent; a restarted loop gets a fresh token.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}
