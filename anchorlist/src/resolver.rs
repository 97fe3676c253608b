use crate::{SizeStore, VisibleRange};

/// Resolves the items to materialize for a window of the list.
///
/// `scroll_offset` and the returned `start_offset` are list-space coordinates. The strictly
/// visible items are the ones intersecting `[scroll_offset, scroll_offset + viewport_extent)`;
/// `overscan` more items are added on each side, clamped to the list.
///
/// Never fails and never inverts:
/// - an empty store resolves to `None`;
/// - a zero `viewport_extent` (not laid out yet) resolves to the single item at the offset, so
///   the host has something to measure;
/// - offsets past the last full window are clamped to `max(0, total - viewport)`;
/// - negative, NaN or infinite inputs are treated as `0`.
pub fn resolve(
    store: &SizeStore,
    scroll_offset: f64,
    viewport_extent: f64,
    overscan: usize,
) -> Option<VisibleRange> {
    let count = store.len();
    if count == 0 {
        return None;
    }
    let last = count - 1;

    let viewport = finite_or_zero(viewport_extent);
    let max_scroll = (store.total_extent() - viewport).max(0.0);
    let scroll = finite_or_zero(scroll_offset).min(max_scroll);

    let start = store.first_index_after(scroll).min(last);
    let end = if viewport > 0.0 {
        store
            .last_index_before(scroll + viewport)
            .map_or(start, |i| i.clamp(start, last))
    } else {
        start
    };

    let start_index = start.saturating_sub(overscan);
    let end_index = end.saturating_add(overscan).min(last);
    vtrace!(scroll, viewport, start_index, end_index, "resolve");
    Some(VisibleRange {
        start_index,
        end_index,
        start_offset: store.offset_of(start_index),
    })
}

pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
