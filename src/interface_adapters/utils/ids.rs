use std::sync::atomic::{AtomicU64, Ordering};

// Actor ids handed out by this process start high so they stay clear of
// small ids picked by clients (`?actor_id=` on connect).
const FIRST_GENERATED_ID: u64 = 1 << 32;

/// Returns a process-unique, increasing identifier for actors and connections.
pub fn next_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(FIRST_GENERATED_ID);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}
