use std::cell::UnsafeCell;
use std::ptr::{read_volatile, write_volatile};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Deserialize;

/// A counter that several threads bump at once.
pub trait SharedCounter: Sync {
    fn increment(&self);
    fn value(&self) -> u64;
}

/// Memory ordering used for the atomic increment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncrementOrdering {
    #[default]
    SeqCst,
    Relaxed,
}

impl From<IncrementOrdering> for Ordering {
    fn from(ordering: IncrementOrdering) -> Self {
        match ordering {
            IncrementOrdering::SeqCst => Ordering::SeqCst,
            IncrementOrdering::Relaxed => Ordering::Relaxed,
        }
    }
}

#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicU64,
    ordering: IncrementOrdering,
}

impl AtomicCounter {
    pub fn new(ordering: IncrementOrdering) -> Self {
        Self {
            value: AtomicU64::new(0),
            ordering,
        }
    }
}

impl SharedCounter for AtomicCounter {
    fn increment(&self) {
        self.value.fetch_add(1, self.ordering.into());
    }

    fn value(&self) -> u64 {
        self.value.load(self.ordering.into())
    }
}

/// A plain integer shared between threads with no synchronisation at all.
///
/// Every increment is a separate load and store, so two threads that read
/// the same value both write back `value + 1` and one update is lost. This
/// type exists to show that happening; don't use it for anything else.
#[derive(Debug, Default)]
pub struct RacyCounter {
    value: UnsafeCell<u64>,
}

// SAFETY: this is unsound on purpose. Concurrent increments are a data race
// and the final value is indeterminate. The only thing relied on is that a
// u64 load or store on the supported targets never tears.
unsafe impl Sync for RacyCounter {}

impl RacyCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SharedCounter for RacyCounter {
    fn increment(&self) {
        let ptr = self.value.get();
        // volatile keeps the compiler from folding the worker loop into one add
        unsafe {
            let current = read_volatile(ptr);
            write_volatile(ptr, current.wrapping_add(1));
        }
    }

    fn value(&self) -> u64 {
        unsafe { read_volatile(self.value.get()) }
    }
}

#[derive(Debug, Default)]
pub struct LockedCounter {
    value: Mutex<u64>,
}

impl LockedCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SharedCounter for LockedCounter {
    fn increment(&self) {
        // a panicking holder can't leave a u64 half written
        let mut lock = self.value.lock().unwrap_or_else(|err| err.into_inner());
        *lock += 1;
    }

    fn value(&self) -> u64 {
        *self.value.lock().unwrap_or_else(|err| err.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn bump<C: SharedCounter>(counter: &C, times: usize) -> u64 {
        for _ in 0..times {
            counter.increment();
        }
        counter.value()
    }

    #[test_case(IncrementOrdering::SeqCst; "sequentially consistent")]
    #[test_case(IncrementOrdering::Relaxed; "relaxed")]
    fn atomic_counts_single_threaded(ordering: IncrementOrdering) {
        let counter = AtomicCounter::new(ordering);
        assert_eq!(0, counter.value());
        assert_eq!(1_000, bump(&counter, 1_000));
    }

    #[test]
    fn racy_counts_single_threaded() {
        // without a second writer there is nothing to lose
        let counter = RacyCounter::new();
        assert_eq!(0, counter.value());
        assert_eq!(1_000, bump(&counter, 1_000));
    }

    #[test]
    fn locked_counts_single_threaded() {
        let counter = LockedCounter::new();
        assert_eq!(0, counter.value());
        assert_eq!(1_000, bump(&counter, 1_000));
    }

    #[test]
    fn locked_survives_poisoning() {
        let counter = LockedCounter::new();
        counter.increment();

        let _ = std::thread::scope(|s| {
            s.spawn(|| {
                let _lock = counter.value.lock().unwrap();
                panic!("poison the lock");
            })
            .join()
        });

        assert!(counter.value.is_poisoned());
        counter.increment();
        assert_eq!(2, counter.value());
    }

    #[test]
    fn atomic_counts_across_threads() {
        let counter = AtomicCounter::default();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| bump(&counter, 10_000));
            }
        });
        assert_eq!(40_000, counter.value());
    }

    #[test]
    fn ordering_maps_to_std() {
        assert_eq!(Ordering::SeqCst, Ordering::from(IncrementOrdering::SeqCst));
        assert_eq!(Ordering::Relaxed, Ordering::from(IncrementOrdering::Relaxed));
        assert_eq!(IncrementOrdering::SeqCst, IncrementOrdering::default());
    }
}
