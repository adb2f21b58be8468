//! Process-wide allocation tracing.
//!
//! [`TrackingAllocator`] wraps the system allocator and, while tracing is
//! enabled, maintains a running net-allocation counter and its high-water
//! mark. The crate installs it as the global allocator in `lib.rs`; when
//! tracing is disabled the only overhead per allocation is one relaxed
//! atomic load.
//!
//! Tracing is a single shared toggle: at most one measured region may have
//! it active at a time. The runner executes operations strictly
//! sequentially, which upholds that invariant without locking.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(false);
// Net bytes allocated since tracing began. Signed: frees of memory that
// predates the trace window drive it below zero.
static CURRENT: AtomicIsize = AtomicIsize::new(0);
static PEAK: AtomicIsize = AtomicIsize::new(0);

/// Global allocator that counts live bytes while tracing is enabled.
pub struct TrackingAllocator;

impl TrackingAllocator {
    pub const fn new() -> Self {
        TrackingAllocator
    }
}

fn record_alloc(size: usize) {
    let current = CURRENT.fetch_add(size as isize, Ordering::Relaxed) + size as isize;
    PEAK.fetch_max(current, Ordering::Relaxed);
}

fn record_dealloc(size: usize) {
    CURRENT.fetch_sub(size as isize, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() && ENABLED.load(Ordering::Relaxed) {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        if ENABLED.load(Ordering::Relaxed) {
            record_dealloc(layout.size());
        }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() && ENABLED.load(Ordering::Relaxed) {
            record_dealloc(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// Handle over the process-wide trace window.
///
/// `begin()` resets the counters and enables tracing; `finish()` disables
/// it and yields the peak. Beginning a new window discards the previous
/// one, mirroring `MetricsCollector::start()` semantics.
pub struct AllocTracer;

impl AllocTracer {
    /// Reset counters and start tracing allocations.
    pub fn begin() {
        CURRENT.store(0, Ordering::Relaxed);
        PEAK.store(0, Ordering::Relaxed);
        ENABLED.store(true, Ordering::Relaxed);
    }

    /// Stop tracing and return the peak net allocation in bytes since
    /// [`AllocTracer::begin`].
    pub fn finish() -> u64 {
        ENABLED.store(false, Ordering::Relaxed);
        PEAK.load(Ordering::Relaxed).max(0) as u64
    }

    /// Net bytes currently allocated within the active trace window.
    /// Negative values (frees of pre-window memory) clamp to zero.
    pub fn current() -> u64 {
        CURRENT.load(Ordering::Relaxed).max(0) as u64
    }

    /// Whether a trace window is active.
    pub fn is_active() -> bool {
        ENABLED.load(Ordering::Relaxed)
    }
}

/// Serializes tests that toggle the process-wide tracer. The test harness
/// runs threads in parallel; the tracer is a single shared resource.
#[cfg(test)]
pub(crate) fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_positive_for_large_allocation() {
        let _guard = test_guard();
        AllocTracer::begin();
        let data: Vec<Box<u64>> = (0..100_000u64).map(Box::new).collect();
        let peak = AllocTracer::finish();
        drop(data);

        // 100k boxed integers allocate well over 800 KiB.
        assert!(peak >= 100_000 * std::mem::size_of::<u64>() as u64);
        assert!(!AllocTracer::is_active());
    }

    #[test]
    fn begin_resets_previous_window() {
        let _guard = test_guard();
        AllocTracer::begin();
        let v = vec![0u8; 1 << 20];
        drop(v);
        AllocTracer::begin();
        let peak = AllocTracer::finish();
        // The megabyte from the first window must not leak into the second.
        assert!(peak < 1 << 20);
    }
}
