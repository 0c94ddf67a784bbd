//! Lock-free running total attached to each stored transaction.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// An `f64` that can be read and increased concurrently.
///
/// The value is kept as its IEEE-754 bit pattern inside an [`AtomicU64`], so
/// readers always observe a whole value written by some completed `add`.
pub struct AtomicTotal {
    bits: AtomicU64,
}

impl AtomicTotal {
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Adds `delta` and returns the previous value.
    pub fn add(&self, delta: f64) -> f64 {
        let previous = self
            .bits
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + delta).to_bits())
            });
        // The closure never declines, both arms carry the previous bits.
        match previous {
            Ok(bits) | Err(bits) => f64::from_bits(bits),
        }
    }
}

impl fmt::Debug for AtomicTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicTotal").field(&self.get()).finish()
    }
}
