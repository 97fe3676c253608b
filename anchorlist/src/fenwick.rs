use alloc::vec::Vec;
use core::cmp;

/// Prefix sums over item sizes.
///
/// `tree[i]` stores the sum of the `lsb(i)` sizes ending at item `i - 1`. Node sums are built
/// by addition only (never by subtracting two prefix sums), so a tree made of exactly
/// representable sizes reports exact offsets.
#[derive(Clone, Debug)]
pub(crate) struct Fenwick {
    tree: Vec<f64>, // 1-indexed
    max_bit: usize,
}

impl Fenwick {
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self {
            tree: alloc::vec![0.0],
            max_bit: 0,
        }
    }

    /// Builds the tree in `O(n)`.
    pub(crate) fn from_sizes(sizes: &[f64]) -> Self {
        let n = sizes.len();
        let mut tree = alloc::vec![0.0f64; n + 1];
        for i in 1..=n {
            tree[i] += sizes[i - 1];
            let j = i + lsb(i);
            if j <= n {
                tree[j] += tree[i];
            }
        }
        Self {
            tree,
            max_bit: highest_power_of_two_leq(n),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    /// Drops every item at or after `new_len`. Remaining nodes only cover earlier items, so
    /// they stay valid as-is.
    pub(crate) fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len() {
            return;
        }
        self.tree.truncate(new_len + 1);
        self.max_bit = highest_power_of_two_leq(new_len);
    }

    /// Appends one item in `O(log n)`.
    pub(crate) fn push(&mut self, size: f64) {
        let i = self.len() + 1;
        let start_exclusive = i - lsb(i);

        // The new node covers (start_exclusive, i]; the part before `i` is exactly the chain of
        // existing nodes walked down from `i - 1`.
        let mut covered = size;
        let mut j = i - 1;
        while j > start_exclusive {
            covered += self.tree[j];
            j &= j - 1;
        }
        self.tree.push(covered);
        self.max_bit = highest_power_of_two_leq(i);
    }

    pub(crate) fn add(&mut self, index: usize, delta: f64) {
        let n = self.len();
        if index >= n || delta == 0.0 {
            return;
        }
        let mut i = index + 1;
        while i <= n {
            self.tree[i] += delta;
            i += lsb(i);
        }
    }

    /// Sum of the first `count` sizes (clamped to `len`).
    pub(crate) fn prefix_sum(&self, count: usize) -> f64 {
        let mut i = cmp::min(count, self.len());
        let mut sum = 0.0;
        while i > 0 {
            sum += self.tree[i];
            i &= i - 1;
        }
        sum
    }

    pub(crate) fn total(&self) -> f64 {
        self.prefix_sum(self.len())
    }

    /// Returns the number of leading items whose cumulative end is `<= target`.
    pub(crate) fn lower_bound(&self, target: f64) -> usize {
        self.descend(target, |node, rest| node <= rest)
    }

    /// Returns the number of leading items whose cumulative end is `< target`.
    pub(crate) fn lower_bound_exclusive(&self, target: f64) -> usize {
        self.descend(target, |node, rest| node < rest)
    }

    fn descend(&self, mut target: f64, take: impl Fn(f64, f64) -> bool) -> usize {
        let n = self.len();
        let mut idx = 0usize;
        let mut bit = self.max_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && take(self.tree[next], target) {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_leq(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    1usize << (usize::BITS - 1 - n.leading_zeros())
}
