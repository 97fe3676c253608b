use alloc::vec::Vec;

use crate::error::is_valid_size;
use crate::fenwick::Fenwick;
use crate::{Error, SizeSource};

/// Item size used when the configured default is unusable.
pub const FALLBACK_ITEM_SIZE: f64 = 40.0;

/// Per-index extent cache with prefix-sum offsets.
///
/// Every index in `[0, len)` holds a size and its [`SizeSource`]. Unmeasured items start at the
/// default estimate. Offsets are list-space coordinates: `offset_of(0) == 0` and
/// `offset_of(len) == total_extent()`.
///
/// Complexity:
/// - `set`, `offset_of`, `index_at`, `total_extent`: `O(log n)`
/// - appending or truncating at the tail: `O(log n)` per item
/// - inserting or removing anywhere else: `O(n)` (the size vector shifts, prefix sums are rebuilt)
#[derive(Clone, Debug)]
pub struct SizeStore {
    sizes: Vec<f64>,
    sources: Vec<SizeSource>,
    sums: Fenwick,
    default_size: f64,
    measured: usize,
}

impl SizeStore {
    /// Creates a store of `count` estimated items.
    ///
    /// A negative or non-finite `default_size` is replaced by [`FALLBACK_ITEM_SIZE`].
    pub fn new(count: usize, default_size: f64) -> Self {
        let default_size = usable_default(default_size);
        let sizes = alloc::vec![default_size; count];
        Self {
            sums: Fenwick::from_sizes(&sizes),
            sources: alloc::vec![SizeSource::Estimated; count],
            sizes,
            default_size,
            measured: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn default_size(&self) -> f64 {
        self.default_size
    }

    /// Changes the default estimate and re-estimates every item that has not been measured.
    pub fn set_default_size(&mut self, size: f64) {
        let size = usable_default(size);
        if size == self.default_size {
            return;
        }
        self.default_size = size;
        for (s, src) in self.sizes.iter_mut().zip(&self.sources) {
            if *src == SizeSource::Estimated {
                *s = size;
            }
        }
        self.rebuild();
    }

    /// Size of `index`, or the default estimate when `index` is out of range.
    pub fn get(&self, index: usize) -> f64 {
        self.sizes.get(index).copied().unwrap_or(self.default_size)
    }

    pub fn source(&self, index: usize) -> Option<SizeSource> {
        self.sources.get(index).copied()
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.source(index) == Some(SizeSource::Measured)
    }

    /// Number of items currently holding a measured size.
    pub fn measured_count(&self) -> usize {
        self.measured
    }

    /// Writes a size and returns how much the item grew (negative when it shrank).
    ///
    /// A measured size is authoritative: an `Estimated` write to a measured item is ignored and
    /// only [`Self::invalidate`] demotes it again. Writing the current value again returns `0.0`.
    pub fn set(&mut self, index: usize, size: f64, source: SizeSource) -> Result<f64, Error> {
        let count = self.len();
        if index >= count {
            return reject!(Error::InvalidIndex { index, count });
        }
        if !is_valid_size(size) {
            return reject!(Error::NonFiniteSize { index, size });
        }

        match (self.sources[index], source) {
            (SizeSource::Measured, SizeSource::Estimated) => return Ok(0.0),
            (SizeSource::Estimated, SizeSource::Measured) => {
                self.sources[index] = SizeSource::Measured;
                self.measured += 1;
            }
            _ => {}
        }

        let cur = self.sizes[index];
        if cur == size {
            return Ok(0.0);
        }
        self.sizes[index] = size;
        let delta = size - cur;
        self.sums.add(index, delta);
        Ok(delta)
    }

    /// Demotes `index` back to the default estimate and returns the size change.
    pub fn invalidate(&mut self, index: usize) -> Result<f64, Error> {
        let count = self.len();
        if index >= count {
            return reject!(Error::InvalidIndex { index, count });
        }
        if self.sources[index] == SizeSource::Measured {
            self.sources[index] = SizeSource::Estimated;
            self.measured -= 1;
        }
        let cur = self.sizes[index];
        let delta = self.default_size - cur;
        if delta != 0.0 {
            self.sizes[index] = self.default_size;
            self.sums.add(index, delta);
        }
        Ok(delta)
    }

    /// Inserts `n` estimated items before `at` (`at == len` appends).
    ///
    /// Items at or after `at` move up by `n` and keep their sizes and provenance. An unusable
    /// `estimate` is replaced by the default size.
    pub fn insert(&mut self, at: usize, n: usize, estimate: f64) -> Result<(), Error> {
        let count = self.len();
        if at > count || count.checked_add(n).is_none() {
            return reject!(Error::InvalidIndex { index: at, count });
        }
        if n == 0 {
            return Ok(());
        }
        let estimate = if is_valid_size(estimate) {
            estimate
        } else {
            vwarn!(at, n, estimate, "insert: unusable estimate, using default size");
            self.default_size
        };

        if at == count {
            self.sizes.reserve(n);
            self.sources.reserve(n);
            for _ in 0..n {
                self.sizes.push(estimate);
                self.sources.push(SizeSource::Estimated);
                self.sums.push(estimate);
            }
            return Ok(());
        }

        self.sizes.splice(at..at, core::iter::repeat_n(estimate, n));
        self.sources
            .splice(at..at, core::iter::repeat_n(SizeSource::Estimated, n));
        self.rebuild();
        Ok(())
    }

    /// Removes the `n` items starting at `at`; later items move down by `n`.
    pub fn remove(&mut self, at: usize, n: usize) -> Result<(), Error> {
        let count = self.len();
        let end = match at.checked_add(n) {
            Some(end) if end <= count && (at < count || n == 0) => end,
            _ => return reject!(Error::InvalidIndex { index: at, count }),
        };
        if n == 0 {
            return Ok(());
        }

        let removed_measured = self.sources[at..end]
            .iter()
            .filter(|s| **s == SizeSource::Measured)
            .count();
        self.measured -= removed_measured;

        if end == count {
            self.sizes.truncate(at);
            self.sources.truncate(at);
            self.sums.truncate(at);
            return Ok(());
        }

        self.sizes.drain(at..end);
        self.sources.drain(at..end);
        self.rebuild();
        Ok(())
    }

    /// Start of `index` in list space. Indexes at or past `len` map to the total extent.
    pub fn offset_of(&self, index: usize) -> f64 {
        self.sums.prefix_sum(index)
    }

    /// End of `index` in list space (`offset_of(index) + get(index)` for valid indexes).
    pub fn end_of(&self, index: usize) -> f64 {
        self.sums.prefix_sum(index.saturating_add(1))
    }

    /// The item covering `offset`, clamped into `[0, len)`. `None` only for an empty store.
    ///
    /// An offset on the boundary between two items maps to the later one.
    pub fn index_at(&self, offset: f64) -> Option<usize> {
        let count = self.len();
        if count == 0 {
            return None;
        }
        if offset.is_nan() || offset <= 0.0 {
            return Some(0);
        }
        Some(self.sums.lower_bound(offset).min(count - 1))
    }

    /// First index whose extent reaches past `offset`, keeping zero-size items that sit exactly
    /// at `offset`. Unclamped: may return `len`.
    pub(crate) fn first_index_after(&self, offset: f64) -> usize {
        let i = self.sums.lower_bound_exclusive(offset);
        if i < self.len() && self.sizes[i] > 0.0 && self.end_of(i) <= offset {
            i + 1
        } else {
            i
        }
    }

    /// Last index starting before `offset`. Unclamped: returns `None` when no item does.
    pub(crate) fn last_index_before(&self, offset: f64) -> Option<usize> {
        let count = self.len();
        if count == 0 || offset.is_nan() || offset <= 0.0 {
            return None;
        }
        let mut i = self.sums.lower_bound_exclusive(offset).min(count - 1);
        // A zero-size item right at `offset` ends there but starts there too.
        while i > 0 && self.offset_of(i) >= offset {
            i -= 1;
        }
        Some(i)
    }

    pub fn total_extent(&self) -> f64 {
        self.sums.total()
    }

    /// Iterates `(index, size)` for every measured item.
    pub fn measured(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.sizes
            .iter()
            .zip(&self.sources)
            .enumerate()
            .filter(|(_, (_, src))| **src == SizeSource::Measured)
            .map(|(i, (size, _))| (i, *size))
    }

    fn rebuild(&mut self) {
        vdebug!(count = self.sizes.len(), "SizeStore::rebuild");
        self.sums = Fenwick::from_sizes(&self.sizes);
    }
}

fn usable_default(size: f64) -> f64 {
    if is_valid_size(size) {
        size
    } else {
        vwarn!(size, "unusable default item size, falling back");
        FALLBACK_ITEM_SIZE
    }
}
