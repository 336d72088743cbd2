use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// "Request in flight" flag behind a control.
///
/// Set through [`BusyFlag::enter`]; the returned guard clears it when
/// dropped, including when the request future itself is dropped.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    set: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Relaxed)
    }

    pub fn enter(&self) -> BusyGuard {
        BusyGuard::new(self.set.clone())
    }
}

#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct BusyGuard {
    set: Arc<AtomicBool>,
}

impl BusyGuard {
    fn new(set: Arc<AtomicBool>) -> Self {
        set.store(true, Ordering::Relaxed);
        Self { set }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.set.store(false, Ordering::Relaxed);
    }
}
