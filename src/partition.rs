//! Module to split a strand's index range into disjoint ranges.
//!
//! Every [Partition] built here is exact: its ranges are ascending, never
//! overlap and together cover `[0, len)`. This is what allows workers to
//! mutate the same buffer concurrently without any lock, each one gets its
//! own `&mut [u8]` obtained through `split_at_mut`.
use crate::error::{ComplementError, Result};
use std::ops::Range;

/// Ordered, disjoint ranges covering a buffer of length `len`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    len: usize,
    ranges: Vec<Range<usize>>,
}

impl Partition {
    /// Length of the buffer this partition was computed for
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the partitioned buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The ranges, in ascending order
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Number of ranges, which is the number of tasks that will be scheduled
    pub fn count(&self) -> usize {
        self.ranges.len()
    }

    /// Checks that the ranges are contiguous and cover exactly `[0, len)`
    pub fn is_exact(&self) -> bool {
        let mut expected = 0;
        for range in &self.ranges {
            if range.start != expected || range.end < range.start {
                return false;
            }
            expected = range.end;
        }
        expected == self.len
    }

    /// Splits `buf` into one mutable sub-slice per range, each paired with
    /// the offset of its first element.
    pub fn split_mut<'a>(&self, mut buf: &'a mut [u8]) -> Result<Vec<(usize, &'a mut [u8])>> {
        if buf.len() != self.len {
            return Err(ComplementError::LengthMismatch {
                expected: self.len,
                actual: buf.len(),
            });
        }
        let mut chunks = Vec::with_capacity(self.ranges.len());
        let mut consumed = 0;
        for range in &self.ranges {
            let rest = std::mem::take(&mut buf);
            let (_, rest) = rest.split_at_mut(range.start - consumed);
            let (chunk, rest) = rest.split_at_mut(range.len());
            chunks.push((range.start, chunk));
            buf = rest;
            consumed = range.end;
        }
        Ok(chunks)
    }
}

/// Fixed-chunk policy: a given number of equally sized ranges.
///
/// `size = len / chunks`, the last range is extended to `len` so the
/// remainder of the integer division is never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedChunks {
    chunks: usize,
}

impl FixedChunks {
    pub fn new(chunks: usize) -> Result<Self> {
        if chunks == 0 {
            return Err(ComplementError::InvalidConfig(
                "chunk count must be at least 1".to_string(),
            ));
        }
        Ok(FixedChunks { chunks })
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn partition(&self, len: usize) -> Partition {
        let size = len / self.chunks;
        let ranges = (0..self.chunks)
            .map(|i| {
                let start = i * size;
                if i + 1 == self.chunks {
                    start..len
                } else {
                    start..start + size
                }
            })
            .collect();
        Partition { len, ranges }
    }
}

/// Recursive halving policy: a range shorter than `limit` is a leaf,
/// anything else is bisected and each half handled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursiveHalving {
    limit: usize,
}

impl RecursiveHalving {
    /// `limit` must be at least 2, otherwise a range of length 1 would be
    /// bisected forever.
    pub fn new(limit: usize) -> Result<Self> {
        if limit < 2 {
            return Err(ComplementError::InvalidConfig(format!(
                "recursion limit must be at least 2, got {limit}"
            )));
        }
        Ok(RecursiveHalving { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Decides how a range of `len` elements is handled: `None` for a leaf,
    /// otherwise the length of the left half.
    pub fn split_len(&self, len: usize) -> Option<usize> {
        if len < self.limit {
            None
        } else {
            Some(len / 2)
        }
    }

    /// Bisects `range`, or returns `None` if it is a leaf
    pub fn bisect(&self, range: &Range<usize>) -> Option<(Range<usize>, Range<usize>)> {
        self.split_len(range.len()).map(|split| {
            let mid = range.start + split;
            (range.start..mid, mid..range.end)
        })
    }

    /// Materialises all the leaves reached when halving `[0, len)`
    pub fn leaves(&self, len: usize) -> Partition {
        let mut ranges = vec![];
        self.collect_leaves(0..len, &mut ranges);
        Partition { len, ranges }
    }

    fn collect_leaves(&self, range: Range<usize>, leaves: &mut Vec<Range<usize>>) {
        match self.bisect(&range) {
            None => leaves.push(range),
            Some((left, right)) => {
                self.collect_leaves(left, leaves);
                self.collect_leaves(right, leaves);
            }
        }
    }

    /// Depth of the halving tree for `len` elements
    pub fn depth(&self, len: usize) -> usize {
        match self.split_len(len) {
            None => 0,
            Some(split) => 1 + self.depth(split).max(self.depth(len - split)),
        }
    }
}
