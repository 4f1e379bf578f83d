//! Contiguous range partitioning of the agent index space.

use std::ops::Range;

use smallvec::SmallVec;

use herd_behavior::Motion;

/// Ranges for one tick. Worker counts rarely exceed the inline size.
pub type Ranges = SmallVec<[Range<usize>; 8]>;

/// An owned slice of the motion column handed to one worker task.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionChunk {
    /// Store index of `motion[0]`.
    pub start: usize,
    /// The records themselves.
    pub motion: Vec<Motion>,
}

impl MotionChunk {
    /// Store index range this chunk covers.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.motion.len()
    }
}

/// Split `0..len` into `min(workers, len)` contiguous ranges.
///
/// Every range but the last has `len / count` elements; the last also
/// takes the remainder. `workers == 0` is treated as 1. An empty index
/// space yields no ranges.
pub fn partition_ranges(len: usize, workers: usize) -> Ranges {
    let mut out = Ranges::new();
    if len == 0 {
        return out;
    }
    let count = workers.clamp(1, len);
    let base = len / count;
    for i in 0..count {
        let start = i * base;
        let end = if i + 1 == count { len } else { start + base };
        out.push(start..end);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn last_range_absorbs_remainder() {
        let r = partition_ranges(10, 3);
        assert_eq!(r.as_slice(), &[0..3, 3..6, 6..10]);
    }

    #[test]
    fn more_workers_than_agents() {
        let r = partition_ranges(2, 8);
        assert_eq!(r.as_slice(), &[0..1, 1..2]);
    }

    #[test]
    fn zero_workers_means_one() {
        assert_eq!(partition_ranges(5, 0).as_slice(), &[0..5]);
    }

    #[test]
    fn empty_store_has_no_ranges() {
        assert!(partition_ranges(0, 4).is_empty());
    }

    proptest! {
        #[test]
        fn ranges_cover_exactly_once(len in 0usize..5000, workers in 1usize..64) {
            let ranges = partition_ranges(len, workers);
            let mut next = 0;
            for r in &ranges {
                prop_assert_eq!(r.start, next);
                prop_assert!(r.end > r.start);
                next = r.end;
            }
            prop_assert_eq!(next, len);
            prop_assert!(ranges.len() <= workers);
        }
    }
}
