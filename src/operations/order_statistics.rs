//! Incremental median tracking for sliding windows.
//!
//! [`SlidingMedian`] keeps a multiset of `f64` values split across two heaps: a
//! max-heap holding the lower half and a min-heap holding the upper half. The
//! lower half is never smaller than the upper half and exceeds it by at most one
//! element, so the median is always at one or both heap tops.
//!
//! Removal is lazy. A removed value is recorded in a pending-deletion table and
//! physically discarded only once it surfaces at a heap top. Insert, remove and
//! median are all `O(log n)` amortised.
//!
//! Values are ordered with [`f64::total_cmp`], so `-0.0 < 0.0` and NaNs sort
//! after every finite value rather than poisoning the comparison.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::{KernelResult, ParameterError};

/// `f64` with a total order, usable as a heap key.
#[derive(Debug, Clone, Copy)]
struct OrderedF64(f64);

impl PartialEq for OrderedF64 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Multiset supporting insert, remove and median queries.
///
/// ```rust
/// use sigproc_kernels::operations::order_statistics::SlidingMedian;
///
/// let mut window = SlidingMedian::new();
/// for x in [3.0, 2.0, 5.0] {
///     window.insert(x);
/// }
/// assert_eq!(window.median(), Some(3.0));
///
/// window.remove(3.0).unwrap();
/// window.insert(1.0);
/// assert_eq!(window.median(), Some(2.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlidingMedian {
    low: BinaryHeap<OrderedF64>,
    high: BinaryHeap<Reverse<OrderedF64>>,
    low_len: usize,
    high_len: usize,
    /// Live multiplicity of every value currently in the set, keyed by bit pattern.
    counts: HashMap<u64, usize>,
    /// Removed values still physically present in one of the heaps.
    pending: HashMap<u64, usize>,
}

impl SlidingMedian {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set sized for a window of `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            low: BinaryHeap::with_capacity(capacity / 2 + 1),
            high: BinaryHeap::with_capacity(capacity / 2 + 1),
            low_len: 0,
            high_len: 0,
            counts: HashMap::with_capacity(capacity),
            pending: HashMap::new(),
        }
    }

    /// Number of live values.
    pub const fn len(&self) -> usize {
        self.low_len + self.high_len
    }

    /// Returns true if no values are live.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.low.clear();
        self.high.clear();
        self.low_len = 0;
        self.high_len = 0;
        self.counts.clear();
        self.pending.clear();
    }

    /// Adds one occurrence of `value`.
    pub fn insert(&mut self, value: f64) {
        *self.counts.entry(value.to_bits()).or_insert(0) += 1;
        let key = OrderedF64(value);
        match self.low.peek() {
            Some(&top) if key > top => {
                self.high.push(Reverse(key));
                self.high_len += 1;
            }
            _ => {
                self.low.push(key);
                self.low_len += 1;
            }
        }
        self.rebalance();
    }

    /// Removes one occurrence of `value`.
    ///
    /// # Errors
    /// Returns an invalid-parameter error if `value` is not in the set; the set is
    /// left unchanged.
    pub fn remove(&mut self, value: f64) -> KernelResult<()> {
        let bits = value.to_bits();
        if !decrement(&mut self.counts, bits) {
            return Err(ParameterError::invalid_value(
                "value",
                format!("{value} is not present in the window"),
            )
            .into());
        }

        *self.pending.entry(bits).or_insert(0) += 1;
        let key = OrderedF64(value);
        // low is never empty while the set holds a value, and every live value
        // at or below its top lives in low.
        let in_low = self.low.peek().is_some_and(|&top| key <= top);
        if in_low {
            self.low_len -= 1;
            if self.low.peek() == Some(&key) {
                self.prune_low();
            }
        } else {
            self.high_len -= 1;
            if self.high.peek() == Some(&Reverse(key)) {
                self.prune_high();
            }
        }
        self.rebalance();
        Ok(())
    }

    /// Median of the live values: the middle value for an odd count, the mean
    /// of the two middle values for an even count, `None` when empty.
    pub fn median(&self) -> Option<f64> {
        let lower = self.low.peek()?.0;
        if self.low_len > self.high_len {
            Some(lower)
        } else {
            let upper = self.high.peek()?.0.0;
            Some(lower.midpoint(upper))
        }
    }

    /// Restores `low_len == high_len` or `low_len == high_len + 1`, leaving both
    /// heap tops live.
    fn rebalance(&mut self) {
        if self.low_len > self.high_len + 1 {
            if let Some(top) = self.low.pop() {
                self.high.push(Reverse(top));
                self.low_len -= 1;
                self.high_len += 1;
            }
            self.prune_low();
        } else if self.low_len < self.high_len {
            if let Some(Reverse(top)) = self.high.pop() {
                self.low.push(top);
                self.high_len -= 1;
                self.low_len += 1;
            }
            self.prune_high();
        }
    }

    fn prune_low(&mut self) {
        while let Some(&OrderedF64(top)) = self.low.peek() {
            if !decrement(&mut self.pending, top.to_bits()) {
                break;
            }
            self.low.pop();
        }
    }

    fn prune_high(&mut self) {
        while let Some(&Reverse(OrderedF64(top))) = self.high.peek() {
            if !decrement(&mut self.pending, top.to_bits()) {
                break;
            }
            self.high.pop();
        }
    }
}

/// Decrements the multiplicity of `bits`, dropping the entry at zero. Returns
/// false if `bits` had no entry.
fn decrement(counts: &mut HashMap<u64, usize>, bits: u64) -> bool {
    match counts.get(&bits).copied() {
        None => false,
        Some(1) => {
            counts.remove(&bits);
            true
        }
        Some(n) => {
            counts.insert(bits, n - 1);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sorted_median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            Some(sorted[mid])
        } else {
            Some(sorted[mid - 1].midpoint(sorted[mid]))
        }
    }

    #[test]
    fn empty_set_has_no_median() {
        let window = SlidingMedian::new();
        assert!(window.is_empty());
        assert_eq!(window.median(), None);
    }

    #[test]
    fn insert_tracks_odd_and_even_counts() {
        let mut window = SlidingMedian::with_capacity(4);
        window.insert(4.0);
        assert_eq!(window.median(), Some(4.0));
        window.insert(1.0);
        assert_eq!(window.median(), Some(2.5));
        window.insert(7.0);
        assert_eq!(window.median(), Some(4.0));
        window.insert(2.0);
        assert_eq!(window.median(), Some(3.0));
        assert_eq!(window.len(), 4);
    }

    #[test]
    fn remove_with_duplicates() {
        let mut window = SlidingMedian::new();
        for x in [5.0, 5.0, 5.0, 1.0, 9.0] {
            window.insert(x);
        }
        assert_eq!(window.median(), Some(5.0));
        window.remove(5.0).unwrap();
        window.remove(5.0).unwrap();
        assert_eq!(window.median(), Some(5.0));
        window.remove(5.0).unwrap();
        assert_eq!(window.median(), Some(5.0));
        window.remove(9.0).unwrap();
        assert_eq!(window.median(), Some(1.0));
        window.remove(1.0).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.median(), None);
    }

    #[test]
    fn removing_absent_value_fails_without_side_effects() {
        let mut window = SlidingMedian::new();
        window.insert(1.0);
        window.insert(3.0);
        let err = window.remove(2.0).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert_eq!(window.len(), 2);
        assert_eq!(window.median(), Some(2.0));

        window.remove(3.0).unwrap();
        assert!(window.remove(3.0).is_err());
        assert_eq!(window.median(), Some(1.0));
    }

    #[test]
    fn clear_resets_state() {
        let mut window = SlidingMedian::new();
        window.insert(1.0);
        window.insert(2.0);
        window.remove(1.0).unwrap();
        window.clear();
        assert!(window.is_empty());
        assert!(window.remove(2.0).is_err());
        window.insert(8.0);
        assert_eq!(window.median(), Some(8.0));
    }

    #[test]
    fn signed_zeros_are_distinct_values() {
        let mut window = SlidingMedian::new();
        window.insert(-0.0);
        window.insert(0.0);
        window.remove(0.0).unwrap();
        assert!(window.median().is_some_and(|m| m == 0.0 && m.is_sign_negative()));
    }

    #[test]
    fn even_median_of_extreme_values_does_not_overflow() {
        let mut window = SlidingMedian::new();
        window.insert(-f64::MAX);
        window.insert(f64::MAX);
        assert_eq!(window.median(), Some(0.0));

        window.clear();
        window.insert(f64::MAX);
        window.insert(f64::MAX);
        assert_eq!(window.median(), Some(f64::MAX));

        window.insert(f64::INFINITY);
        window.insert(1.0);
        assert_eq!(window.median(), Some(f64::MAX));
        window.remove(1.0).unwrap();
        assert_eq!(window.median(), Some(f64::MAX));
    }

    #[test]
    fn matches_sort_based_median_under_random_updates() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut window = SlidingMedian::new();
        let mut reference: Vec<f64> = Vec::new();

        for _ in 0..5_000 {
            let remove = !reference.is_empty() && rng.gen_bool(0.45);
            if remove {
                let idx = rng.gen_range(0..reference.len());
                let value = reference.swap_remove(idx);
                window.remove(value).unwrap();
            } else {
                // Small value range so duplicates are common.
                let value = f64::from(rng.gen_range(-8i32..8)) * 0.5;
                reference.push(value);
                window.insert(value);
            }
            assert_eq!(window.len(), reference.len());
            assert_eq!(window.median(), sorted_median(&reference));
        }
    }
}
