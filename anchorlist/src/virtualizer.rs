use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::anchor::{Anchor, JumpCompensator, Mutation, Window, is_at_tail};
use crate::error::is_valid_size;
use crate::resolver::{finite_or_zero, resolve};
use crate::scroll::{ScrollController, ScrollInput, ScrollPhase};
use crate::{
    Align, Axis, Error, FrameState, ScrollDirection, ScrollSource, ScrollState, SizeCache,
    SizeSource, SizeStore, StickEdge, ViewportState, VirtualItem, VirtualizerOptions, VisibleRange,
};

/// A headless virtualization engine for one list.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects.
/// - Your adapter drives it with viewport extents, scroll positions, measurements and count
///   changes, in that order of arrival.
/// - Every size-changing event is compensated: the anchor item stays where it was on screen and
///   the required scroll movement is queued for the host ([`Self::take_pending_correction`]).
/// - Rendering is exposed via [`Self::for_each_virtual_item`].
///
/// Offsets passed in and out are host coordinates (they include `scroll_margin`) unless a method
/// says otherwise. The [`SizeStore`] itself works in list space.
#[derive(Clone, Debug)]
pub struct Virtualizer {
    options: VirtualizerOptions,
    store: SizeStore,
    scroll: ScrollController,
    viewport_extent: f64,

    range: Option<VisibleRange>,
    anchor: Option<Anchor>,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl Virtualizer {
    /// Creates a new virtualizer from options.
    pub fn new(options: VirtualizerOptions) -> Self {
        vdebug!(
            count = options.count,
            default_item_size = options.default_item_size,
            overscan = options.overscan,
            "Virtualizer::new"
        );
        let mut v = Self {
            store: SizeStore::new(options.count, options.default_item_size),
            scroll: ScrollController::new(options.initial_offset.resolve(), options.echo_tolerance),
            viewport_extent: finite_or_zero(options.initial_viewport.unwrap_or(0.0)),
            range: None,
            anchor: None,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        };
        v.refresh(true);
        v
    }

    pub fn options(&self) -> &VirtualizerOptions {
        &self.options
    }

    /// Read access to the size cache (list-space offsets).
    pub fn store(&self) -> &SizeStore {
        &self.store
    }

    pub fn count(&self) -> usize {
        self.store.len()
    }

    pub fn axis(&self) -> Axis {
        self.options.axis
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.options.axis = axis;
    }

    pub fn stick_to(&self) -> StickEdge {
        self.options.stick_to
    }

    pub fn set_stick_to(&mut self, stick_to: StickEdge) {
        if self.options.stick_to == stick_to {
            return;
        }
        self.options.stick_to = stick_to;
        self.refresh(true);
        self.notify();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        if self.options.overscan == overscan {
            return;
        }
        self.options.overscan = overscan;
        self.refresh(false);
        self.notify();
    }

    pub fn set_jump_tolerance(&mut self, tolerance: f64) {
        self.options.jump_tolerance = tolerance;
    }

    pub fn set_echo_tolerance(&mut self, tolerance: f64) {
        self.options.echo_tolerance = tolerance;
        self.scroll.set_echo_tolerance(tolerance);
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&Virtualizer, bool) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    /// Changes the estimate used for unmeasured items (compensated).
    pub fn set_default_item_size(&mut self, size: f64) -> f64 {
        let delta = self
            .compensated(Mutation::Relayout, |store| {
                store.set_default_size(size);
                Ok(())
            })
            .unwrap_or(0.0);
        self.options.default_item_size = self.store.default_size();
        delta
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self, self.scroll.is_scrolling());
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Runs `f` as one atomic cycle with a single `on_change` notification.
    ///
    /// Mutations inside the batch are compensated one by one and their corrections add up. A user
    /// scroll reported after a mutation in the same batch is deferred until the batch ends, so it
    /// never interleaves with a half-applied correction.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 {
            let deferred = self.scroll.end_correction();
            if let Some(raw) = deferred {
                self.resolve_user_scroll(raw);
            }
            self.refresh(false);
            if self.notify_pending.replace(false) {
                self.notify_now();
            }
        }
    }

    fn in_batch(&self) -> bool {
        self.notify_depth.get() > 0
    }

    fn window(&self) -> Window {
        let margin = finite_or_zero(self.options.scroll_margin);
        Window {
            scroll: self.scroll.current_scroll_offset() - margin,
            extent: self.viewport_extent,
            margin,
        }
    }

    /// Applies a size-store mutation inside a compensation cycle and returns the correction.
    fn compensated(
        &mut self,
        mutation: Mutation,
        apply: impl FnOnce(&mut SizeStore) -> Result<(), Error>,
    ) -> Result<f64, Error> {
        let comp = JumpCompensator::begin(
            &self.store,
            self.window(),
            self.options.stick_to,
            self.options.tail_tolerance,
            mutation,
        );
        self.scroll.begin_correction();

        let applied = apply(&mut self.store);
        let delta = match applied {
            Ok(()) => comp.finish(
                &self.store,
                self.viewport_extent,
                self.options.jump_tolerance,
            ),
            Err(_) => 0.0,
        };
        self.scroll.apply_correction(delta);
        self.end_cycle(true);
        applied.map(|()| delta)
    }

    fn end_cycle(&mut self, reanchor: bool) {
        if self.in_batch() {
            self.notify_pending.set(true);
            return;
        }
        if let Some(raw) = self.scroll.end_correction() {
            self.resolve_user_scroll(raw);
        }
        self.refresh(reanchor);
        self.notify_now();
    }

    /// Re-resolves the materialized range and recaptures the anchor when the range moved (or
    /// when `force` is set).
    fn refresh(&mut self, force: bool) {
        let range = self.resolve_window(self.window(), self.options.overscan);
        let moved = match (&range, &self.range) {
            (Some(a), Some(b)) => !a.same_indexes(b),
            (None, None) => false,
            _ => true,
        };
        self.range = range;
        if moved || force {
            self.anchor = Anchor::capture(
                &self.store,
                self.window(),
                self.options.stick_to,
                self.options.tail_tolerance,
            );
        }
    }

    fn resolve_window(&self, window: Window, overscan: usize) -> Option<VisibleRange> {
        // Window scrolling: only the part of the viewport past the list start shows items.
        let (scroll, extent) = if window.scroll < 0.0 {
            let shown = window.extent + window.scroll;
            if window.extent > 0.0 && shown <= 0.0 {
                return None;
            }
            (0.0, shown.max(0.0))
        } else {
            (window.scroll, window.extent)
        };
        resolve(&self.store, scroll, extent, overscan)
    }

    // ---------------------------------------------------------------------------------------
    // Viewport

    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    /// Reports a viewport resize. With [`StickEdge::End`] the trailing item stays glued to the
    /// trailing edge; returns the applied correction.
    pub fn set_viewport_extent(&mut self, extent: f64) -> f64 {
        let extent = finite_or_zero(extent);
        if extent == self.viewport_extent {
            return 0.0;
        }
        vtrace!(extent, "set_viewport_extent");
        let comp = JumpCompensator::begin(
            &self.store,
            self.window(),
            self.options.stick_to,
            self.options.tail_tolerance,
            Mutation::Relayout,
        );
        self.scroll.begin_correction();
        self.viewport_extent = extent;
        let delta = comp.finish(&self.store, extent, self.options.jump_tolerance);
        self.scroll.apply_correction(delta);
        self.end_cycle(true);
        delta
    }

    /// Reports a viewport resize as a `width`/`height` pair, picking the scroll axis.
    pub fn set_viewport_rect(&mut self, width: f64, height: f64) -> f64 {
        self.set_viewport_extent(self.options.axis.main(width, height))
    }

    // ---------------------------------------------------------------------------------------
    // Scrolling

    pub fn scroll_offset(&self) -> f64 {
        self.scroll.current_scroll_offset()
    }

    /// Scroll offset relative to the list start (negative before the list is reached).
    pub fn list_scroll_offset(&self) -> f64 {
        self.window().scroll
    }

    pub fn scroll_phase(&self) -> ScrollPhase {
        self.scroll.phase()
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll.direction()
    }

    /// Net correction the host still has to apply.
    pub fn pending_correction(&self) -> f64 {
        self.scroll.pending_correction()
    }

    /// Drains the pending correction. The host must move its physical scroll position by exactly
    /// this delta, instantly, before the next paint.
    pub fn take_pending_correction(&mut self) -> Option<f64> {
        let delta = self.scroll.take_pending_correction();
        vdebug!(?delta, offset = self.scroll_offset(), "take_pending_correction");
        delta
    }

    /// Handles a scroll position reported by the host as user input.
    pub fn on_user_scroll(&mut self, offset: f64) -> ScrollInput {
        self.on_scroll(offset, ScrollSource::User)
    }

    /// Handles a scroll position reported by the host, tagged with its source.
    pub fn on_scroll(&mut self, offset: f64, source: ScrollSource) -> ScrollInput {
        let input = match source {
            ScrollSource::User => self.scroll.on_user_scroll(offset),
            ScrollSource::Programmatic => self.scroll.on_scroll(offset, source),
        };
        vtrace!(offset, ?source, ?input, "on_scroll");
        if matches!(input, ScrollInput::Applied | ScrollInput::Synced) {
            self.refresh(false);
            self.scroll.finish_resolving();
            self.notify();
        }
        input
    }

    fn resolve_user_scroll(&mut self, raw: f64) {
        if self.scroll.on_user_scroll(raw) == ScrollInput::Applied {
            self.refresh(false);
            self.scroll.finish_resolving();
        }
    }

    /// Applies a user scroll event and marks the virtualizer as scrolling.
    pub fn apply_scroll_event(&mut self, offset: f64, now_ms: u64) -> ScrollInput {
        let mut input = ScrollInput::Ignored;
        self.batch_update(|v| {
            input = v.on_user_scroll(offset);
            if input != ScrollInput::Echo {
                v.notify_scroll_event(now_ms);
            }
        });
        input
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling()
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.scroll.set_is_scrolling(is_scrolling) {
            self.notify();
        }
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        if self.scroll.notify_scroll_event(now_ms) {
            self.notify();
        }
    }

    /// Resets `is_scrolling` once `is_scrolling_reset_delay_ms` elapsed since the last event.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if self
            .scroll
            .update_scrolling(now_ms, self.options.is_scrolling_reset_delay_ms)
        {
            self.notify();
        }
    }

    pub fn max_scroll_offset(&self) -> f64 {
        let margin = finite_or_zero(self.options.scroll_margin);
        margin + (self.store.total_extent() - self.viewport_extent).max(0.0)
    }

    pub fn clamp_scroll_offset(&self, offset: f64) -> f64 {
        if !offset.is_finite() {
            return 0.0;
        }
        offset.clamp(0.0, self.max_scroll_offset())
    }

    /// Whether the viewport shows the end of the list (within `tail_tolerance`).
    pub fn is_at_tail(&self) -> bool {
        is_at_tail(
            self.store.total_extent(),
            self.window(),
            self.options.tail_tolerance,
        )
    }

    /// Programmatically scrolls to `offset` (clamped, no animation).
    ///
    /// The movement is queued for the host like a correction. Returns the applied offset.
    pub fn scroll_to_offset(&mut self, offset: f64) -> f64 {
        let target = self.clamp_scroll_offset(offset);
        let delta = target - self.scroll_offset();
        if delta != 0.0 {
            self.scroll.begin_correction();
            self.scroll.apply_correction(delta);
            self.end_cycle(true);
        }
        self.scroll_offset()
    }

    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.scroll_to_offset(self.scroll_offset() + delta)
    }

    /// Programmatically scrolls to an index (no animation). Returns the applied offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> f64 {
        let offset = self.scroll_to_index_offset(index, align);
        self.scroll_to_offset(offset)
    }

    /// Computes the (clamped) scroll offset that brings `index` into view with `align`.
    pub fn scroll_to_index_offset(&self, index: usize, align: Align) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let index = index.min(count - 1);
        let item = self.item(index);
        let view = self.viewport_extent;

        let target = match align {
            Align::Start => item.start,
            Align::End => item.end() - view,
            Align::Center => item.start + item.size / 2.0 - view / 2.0,
            Align::Auto => {
                let cur = self.scroll_offset();
                let cur_end = cur + view;
                if item.start >= cur && item.end() <= cur_end {
                    cur
                } else if item.start < cur || item.size > view {
                    item.start
                } else {
                    item.end() - view
                }
            }
        };

        self.clamp_scroll_offset(target)
    }

    // ---------------------------------------------------------------------------------------
    // Measurement

    /// Records the measured size of a materialized item and returns the applied correction.
    ///
    /// Measurements for indexes past the current count are discarded with
    /// [`Error::InconsistentMutationOrder`]; unusable sizes are rejected with
    /// [`Error::NonFiniteSize`] and the item keeps its previous size.
    pub fn measure(&mut self, index: usize, size: f64) -> Result<f64, Error> {
        let count = self.count();
        if index >= count {
            return reject!(Error::InconsistentMutationOrder { index, count });
        }
        if !is_valid_size(size) {
            return reject!(Error::NonFiniteSize { index, size });
        }
        if self.store.is_measured(index) && self.store.get(index) == size {
            return Ok(0.0);
        }
        vtrace!(index, size, "measure");
        self.compensated(Mutation::Resize { index }, |store| {
            store.set(index, size, SizeSource::Measured).map(|_| ())
        })
    }

    /// Same as [`Self::measure`], taking a `width`/`height` pair and picking the scroll axis.
    pub fn measure_rect(&mut self, index: usize, width: f64, height: f64) -> Result<f64, Error> {
        self.measure(index, self.options.axis.main(width, height))
    }

    /// Records a layout pass worth of measurements as one cycle and returns the net correction.
    ///
    /// Rejected entries are logged and skipped.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, f64)>) -> f64 {
        let mut applied = 0.0;
        self.batch_update(|v| {
            for (index, size) in measurements {
                if let Ok(delta) = v.measure(index, size) {
                    applied += delta;
                }
            }
        });
        applied
    }

    /// Drops the measurement of `index` (its content changed) and falls back to the estimate.
    pub fn invalidate(&mut self, index: usize) -> Result<f64, Error> {
        self.compensated(Mutation::Resize { index }, |store| {
            store.invalidate(index).map(|_| ())
        })
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.store.is_measured(index)
    }

    // ---------------------------------------------------------------------------------------
    // Count changes

    /// Inserts `n` items before `at`, estimated at the default size.
    pub fn insert(&mut self, at: usize, n: usize) -> Result<f64, Error> {
        let estimate = self.store.default_size();
        self.insert_with_estimate(at, n, estimate)
    }

    /// Inserts `n` items before `at` with a caller-supplied estimate. Returns the correction.
    pub fn insert_with_estimate(
        &mut self,
        at: usize,
        n: usize,
        estimate: f64,
    ) -> Result<f64, Error> {
        vdebug!(at, n, estimate, "insert");
        let result = self.compensated(Mutation::Insert { at, count: n }, |store| {
            store.insert(at, n, estimate)
        });
        self.options.count = self.store.len();
        result
    }

    /// Removes the `n` items starting at `at`. Returns the correction.
    pub fn remove(&mut self, at: usize, n: usize) -> Result<f64, Error> {
        vdebug!(at, n, "remove");
        let result = self.compensated(Mutation::Remove { at, count: n }, |store| {
            store.remove(at, n)
        });
        self.options.count = self.store.len();
        result
    }

    /// Grows or shrinks the list at its end (append / truncate).
    pub fn set_count(&mut self, count: usize) -> f64 {
        let cur = self.count();
        let result = if count > cur {
            self.insert(cur, count - cur)
        } else {
            self.remove(count, cur - count)
        };
        result.unwrap_or(0.0)
    }

    /// Grows or shrinks the list at its start (prepend / drop), keeping the visible items in
    /// place.
    pub fn set_count_from_start(&mut self, count: usize) -> f64 {
        let cur = self.count();
        let result = if count > cur {
            self.insert(0, count - cur)
        } else {
            self.remove(0, cur - count)
        };
        result.unwrap_or(0.0)
    }

    // ---------------------------------------------------------------------------------------
    // Queries

    /// Total extent of the list (excluding `scroll_margin`).
    pub fn total_extent(&self) -> f64 {
        self.store.total_extent()
    }

    /// The anchor captured at the last range change or mutation.
    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Captures an anchor for the current scroll position.
    pub fn capture_anchor(&self) -> Option<Anchor> {
        Anchor::capture(
            &self.store,
            self.window(),
            self.options.stick_to,
            self.options.tail_tolerance,
        )
    }

    /// The materialized range (with overscan), as of the last resolution.
    pub fn virtual_range(&self) -> Option<VisibleRange> {
        self.range
    }

    /// The strictly visible range (no overscan).
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.resolve_window(self.window(), 0)
    }

    /// Resolves the materialized range for an arbitrary host scroll offset and viewport.
    pub fn resolve_for(&self, scroll_offset: f64, viewport_extent: f64) -> Option<VisibleRange> {
        let margin = finite_or_zero(self.options.scroll_margin);
        let scroll = if scroll_offset.is_finite() {
            scroll_offset
        } else {
            0.0
        };
        let window = Window {
            scroll: scroll - margin,
            extent: finite_or_zero(viewport_extent),
            margin,
        };
        self.resolve_window(window, self.options.overscan)
    }

    /// Calls `f` for every materialized item in index order, with engine-computed offsets.
    pub fn for_each_virtual_item(&self, mut f: impl FnMut(VirtualItem)) {
        let Some(range) = self.range else {
            return;
        };
        let margin = finite_or_zero(self.options.scroll_margin);
        let mut start = margin + range.start_offset;
        for index in range.indexes() {
            let size = self.store.get(index);
            f(VirtualItem {
                index,
                start,
                size,
                measured: self.store.is_measured(index),
            });
            start += size;
        }
    }

    /// Collects materialized items into `out` (clears `out` first).
    pub fn collect_virtual_items(&self, out: &mut Vec<VirtualItem>) {
        out.clear();
        self.for_each_virtual_item(|it| out.push(it));
    }

    pub fn item_offset(&self, index: usize) -> Option<f64> {
        (index < self.count()).then(|| self.item(index).start)
    }

    pub fn item_size(&self, index: usize) -> Option<f64> {
        (index < self.count()).then(|| self.store.get(index))
    }

    pub fn item_end(&self, index: usize) -> Option<f64> {
        (index < self.count()).then(|| self.item(index).end())
    }

    /// The item at a host offset (clamped into the list).
    pub fn index_at_offset(&self, offset: f64) -> Option<usize> {
        let margin = finite_or_zero(self.options.scroll_margin);
        self.store.index_at(offset - margin)
    }

    fn item(&self, index: usize) -> VirtualItem {
        let margin = finite_or_zero(self.options.scroll_margin);
        VirtualItem {
            index,
            start: margin + self.store.offset_of(index),
            size: self.store.get(index),
            measured: self.store.is_measured(index),
        }
    }

    // ---------------------------------------------------------------------------------------
    // Snapshots

    pub fn viewport_state(&self) -> ViewportState {
        ViewportState {
            extent: self.viewport_extent,
        }
    }

    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.scroll_offset(),
            is_scrolling: self.is_scrolling(),
        }
    }

    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport_state(),
            scroll: self.scroll_state(),
        }
    }

    /// Restores viewport + scroll state from a snapshot.
    ///
    /// The host is expected to restore its own scroll position to the same offset, so nothing is
    /// queued as a correction. When `frame.scroll.is_scrolling` is `true`, the scrolling debounce
    /// restarts at `now_ms`.
    pub fn restore_frame_state(&mut self, frame: FrameState, now_ms: u64) {
        self.batch_update(|v| {
            v.viewport_extent = finite_or_zero(frame.viewport.extent);
            let offset = v.clamp_scroll_offset(frame.scroll.offset);
            v.scroll.sync_offset(offset);
            if frame.scroll.is_scrolling {
                v.notify_scroll_event(now_ms);
            } else {
                v.set_is_scrolling(false);
            }
            v.refresh(true);
            v.notify_pending.set(true);
        });
    }

    /// Exports the measured sizes (useful for persistence across remounts).
    pub fn export_size_cache(&self) -> SizeCache {
        SizeCache {
            default_item_size: self.store.default_size(),
            measured: self.store.measured().collect(),
        }
    }

    /// Imports measured sizes as one compensated cycle. Entries past the current count are
    /// skipped. Returns the net correction.
    pub fn import_size_cache(&mut self, cache: &SizeCache) -> f64 {
        let mut applied = self.set_default_item_size(cache.default_item_size);
        let count = self.count();
        let entries = cache.measured.iter().copied().filter(|&(i, _)| i < count);
        vdebug!(entries = cache.len(), count, "import_size_cache");
        applied += self.measure_many(entries);
        applied
    }
}
