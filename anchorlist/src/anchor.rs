//! Scroll anchoring and jump compensation.
//!
//! Before anything changes the size store (a measurement, an insert/remove, a viewport resize),
//! the engine captures an [`Anchor`]: one visible item and the signed distance between its edge
//! and the matching viewport edge. After the change, [`JumpCompensator::finish`] returns the scroll
//! delta that puts that item back at the same visual position.

use crate::{SizeStore, StickEdge};

/// The viewport in list-space coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    /// Scroll offset relative to the list start. Negative while the list has not reached the
    /// viewport's leading edge yet (window scrolling with a `scroll_margin`).
    pub scroll: f64,
    pub extent: f64,
    /// How far `scroll` may go below zero (the list's `scroll_margin`).
    pub margin: f64,
}

impl Window {
    pub fn end(&self) -> f64 {
        self.scroll + self.extent
    }

    /// Smallest and largest valid list-space scroll offsets for `total` extent.
    pub fn bounds(&self, total: f64) -> (f64, f64) {
        (-self.margin, (total - self.extent).max(0.0))
    }
}

/// The visual reference point kept stable across mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub index: usize,
    pub edge: StickEdge,
    /// For [`StickEdge::Start`], `item_start - viewport_start`; for [`StickEdge::End`],
    /// `item_end - viewport_end`.
    pub offset: f64,
    /// Whether the viewport was pinned to the end of the list (only tracked for `End`).
    pub at_tail: bool,
}

impl Anchor {
    /// Captures the anchor for `edge`. Returns `None` for an empty list or an unmeasured viewport.
    ///
    /// The item crossing the anchor edge wins when at least half of it is inside the viewport.
    /// Otherwise its inner neighbour wins if that one is at least half visible.
    pub fn capture(
        store: &SizeStore,
        window: Window,
        edge: StickEdge,
        tail_tolerance: f64,
    ) -> Option<Self> {
        let count = store.len();
        if count == 0 || window.extent.is_nan() || window.extent <= 0.0 {
            return None;
        }
        let last = count - 1;

        let index = match edge {
            StickEdge::Start => {
                let crossing = store.first_index_after(window.scroll.max(0.0)).min(last);
                if crossing < last
                    && visible_fraction(store, window, crossing) < 0.5
                    && visible_fraction(store, window, crossing + 1) >= 0.5
                {
                    crossing + 1
                } else {
                    crossing
                }
            }
            StickEdge::End => {
                let crossing = store
                    .last_index_before(window.end())
                    .unwrap_or(0)
                    .min(last);
                if crossing > 0
                    && visible_fraction(store, window, crossing) < 0.5
                    && visible_fraction(store, window, crossing - 1) >= 0.5
                {
                    crossing - 1
                } else {
                    crossing
                }
            }
        };

        let total = store.total_extent();
        Some(Self {
            index,
            edge,
            offset: edge_offset(store, window, edge, index),
            at_tail: edge == StickEdge::End && is_at_tail(total, window, tail_tolerance),
        })
    }

    /// The list-space scroll offset that restores this anchor for a viewport of `extent`.
    ///
    /// Unclamped; an `at_tail` anchor resolves to the end of the list.
    pub fn target_scroll(&self, store: &SizeStore, extent: f64) -> f64 {
        match self.edge {
            StickEdge::Start => store.offset_of(self.index) - self.offset,
            StickEdge::End if self.at_tail => (store.total_extent() - extent).max(0.0),
            StickEdge::End => store.end_of(self.index) - self.offset - extent,
        }
    }
}

/// Whether `window` shows the end of a list of `total` extent, allowing `tolerance` of slack
/// before the exact tail position.
pub fn is_at_tail(total: f64, window: Window, tolerance: f64) -> bool {
    let tail = (total - window.extent).max(0.0);
    window.scroll + tolerance.max(0.0) >= tail
}

/// A change to the size store that may shift the anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// One item changed size (measurement or invalidation).
    Resize { index: usize },
    /// `count` items were inserted before `at`.
    Insert { at: usize, count: usize },
    /// The `count` items starting at `at` were removed.
    Remove { at: usize, count: usize },
    /// Sizes changed without moving any index (viewport resize, bulk re-estimate).
    Relayout,
}

/// Keeps the anchor visually stable across one [`Mutation`].
///
/// Usage: [`JumpCompensator::begin`] with the pre-mutation store, apply the mutation, then
/// [`JumpCompensator::finish`] with the post-mutation store.
#[derive(Clone, Copy, Debug)]
pub struct JumpCompensator {
    anchor: Option<Anchor>,
    window: Window,
}

impl JumpCompensator {
    pub fn begin(
        store: &SizeStore,
        window: Window,
        edge: StickEdge,
        tail_tolerance: f64,
        mutation: Mutation,
    ) -> Self {
        let anchor = Anchor::capture(store, window, edge, tail_tolerance)
            .and_then(|a| survivor(store, window, a, mutation));
        vtrace!(?anchor, ?mutation, "JumpCompensator::begin");
        Self { anchor, window }
    }

    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Returns the list-space scroll delta that restores the anchor, clamped so the resulting
    /// offset stays scrollable. Deltas within `tolerance` are reported as `0.0`.
    pub fn finish(self, store: &SizeStore, extent: f64, tolerance: f64) -> f64 {
        let Some(anchor) = self.anchor else {
            return 0.0;
        };
        if anchor.index >= store.len() {
            return 0.0;
        }
        let window = Window {
            extent,
            ..self.window
        };
        let (min, max) = window.bounds(store.total_extent());
        let target = anchor.target_scroll(store, extent).clamp(min, max);
        let delta = target - self.window.scroll;
        if delta.abs() <= tolerance.max(0.0) {
            return 0.0;
        }
        vdebug!(index = anchor.index, delta, "JumpCompensator::finish");
        delta
    }
}

/// Maps a pre-mutation anchor onto the post-mutation index space. A removed anchor hands over to
/// its nearest surviving neighbour, positioned where that neighbour was before the removal.
fn survivor(
    store: &SizeStore,
    window: Window,
    anchor: Anchor,
    mutation: Mutation,
) -> Option<Anchor> {
    let index = anchor.index;
    match mutation {
        Mutation::Resize { .. } | Mutation::Relayout => Some(anchor),
        Mutation::Insert { at, count } if index >= at => Some(Anchor {
            index: index.saturating_add(count),
            ..anchor
        }),
        Mutation::Insert { .. } => Some(anchor),
        Mutation::Remove { at, count } => {
            // An overflowing range is rejected by the store; leave the anchor alone.
            let Some(end) = at.checked_add(count) else {
                return Some(anchor);
            };
            if index >= end {
                return Some(Anchor {
                    index: index - count,
                    ..anchor
                });
            }
            if index < at {
                return Some(anchor);
            }

            let after = (end < store.len()).then_some(end);
            let before = at.checked_sub(1);
            let (old, new) = match anchor.edge {
                StickEdge::Start => after.map(|i| (i, at)).or(before.map(|i| (i, i)))?,
                StickEdge::End => before.map(|i| (i, i)).or(after.map(|i| (i, at)))?,
            };
            Some(Anchor {
                index: new,
                offset: edge_offset(store, window, anchor.edge, old),
                ..anchor
            })
        }
    }
}

fn edge_offset(store: &SizeStore, window: Window, edge: StickEdge, index: usize) -> f64 {
    match edge {
        StickEdge::Start => store.offset_of(index) - window.scroll,
        StickEdge::End => store.end_of(index) - window.end(),
    }
}

fn visible_fraction(store: &SizeStore, window: Window, index: usize) -> f64 {
    let start = store.offset_of(index);
    let end = store.end_of(index);
    let size = end - start;
    if size <= 0.0 {
        return if start >= window.scroll && start <= window.end() {
            1.0
        } else {
            0.0
        };
    }
    let shown = end.min(window.end()) - start.max(window.scroll);
    (shown / size).clamp(0.0, 1.0)
}
