use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-flight request guard for manually triggered actions.
///
/// Acquiring while a previous acquisition is still live fails instead of
/// queueing, so repeated triggers cannot fan out into redundant
/// concurrent calls for the same task.
#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    busy: Arc<AtomicBool>,
}

/// Live acquisition; releases the guard on drop, on every exit path.
pub struct RequestToken {
    busy: Arc<AtomicBool>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> Option<RequestToken> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RequestToken {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

impl Drop for RequestToken {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_token_lives() {
        let guard = RequestGuard::new();
        let token = guard.acquire().expect("first acquire");
        assert!(guard.is_busy());
        assert!(guard.acquire().is_none());
        drop(token);
        assert!(!guard.is_busy());
        assert!(guard.acquire().is_some());
    }

    #[test]
    fn clones_share_the_same_gate() {
        let guard = RequestGuard::new();
        let other = guard.clone();
        let _token = guard.acquire().unwrap();
        assert!(other.acquire().is_none());
    }
}
