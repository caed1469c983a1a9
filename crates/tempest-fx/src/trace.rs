//! Descriptor allocation counting, compiled in with the `mem-trace`
//! feature. Debug instrumentation only; nothing in the engine reads these
//! counters at runtime.

use std::sync::atomic::{AtomicU64, Ordering};

static DESCRIPTORS_CREATED: AtomicU64 = AtomicU64::new(0);

pub(crate) fn descriptor_created() {
    DESCRIPTORS_CREATED.fetch_add(1, Ordering::Relaxed);
}

/// Total descriptors constructed since process start (or the last reset).
pub fn descriptors_created() -> u64 {
    DESCRIPTORS_CREATED.load(Ordering::Relaxed)
}

pub fn reset() {
    DESCRIPTORS_CREATED.store(0, Ordering::Relaxed);
}
