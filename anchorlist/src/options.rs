use alloc::sync::Arc;

use crate::size_store::FALLBACK_ITEM_SIZE;
use crate::virtualizer::Virtualizer;
use crate::{Axis, StickEdge};

/// A callback fired when the virtualizer's state changes.
///
/// The second argument is `is_scrolling`.
pub type OnChangeCallback = Arc<dyn Fn(&Virtualizer, bool) + Send + Sync>;

/// Initial scroll offset configuration.
#[derive(Clone)]
pub enum InitialOffset {
    /// A fixed initial offset.
    Value(f64),
    /// A lazily evaluated initial offset provider (called by `Virtualizer::new`).
    Provider(Arc<dyn Fn() -> f64 + Send + Sync>),
}

impl InitialOffset {
    pub(crate) fn resolve(&self) -> f64 {
        let v = match self {
            Self::Value(v) => *v,
            Self::Provider(f) => f(),
        };
        if v.is_finite() { v.max(0.0) } else { 0.0 }
    }
}

impl Default for InitialOffset {
    fn default() -> Self {
        Self::Value(0.0)
    }
}

impl core::fmt::Debug for InitialOffset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Configuration for [`crate::Virtualizer`].
///
/// Cheap to clone: the callback lives in an `Arc`.
pub struct VirtualizerOptions {
    pub count: usize,

    /// Size assumed for items that have not been measured yet.
    pub default_item_size: f64,

    /// Extra items materialized beyond each edge of the visible range.
    pub overscan: usize,

    /// Which viewport edge the scroll anchor is measured from.
    pub stick_to: StickEdge,

    /// The scroll axis. Only used to pick extents out of `width`/`height` pairs.
    pub axis: Axis,

    /// Where the list starts inside the scroll container.
    ///
    /// Use this when the scroll offset comes from a larger container (e.g. the whole window)
    /// and the list begins after some header content. All host offsets include it.
    pub scroll_margin: f64,

    pub initial_offset: InitialOffset,

    /// Viewport extent to assume before the host reports one.
    pub initial_viewport: Option<f64>,

    /// Corrections at or below this magnitude are skipped.
    ///
    /// Host engines round scroll positions differently; a value around half a device pixel
    /// avoids chasing sub-pixel noise. `0.0` applies every non-zero correction.
    pub jump_tolerance: f64,

    /// How far a reported scroll position may be from a requested correction and still be
    /// recognized as its echo.
    pub echo_tolerance: f64,

    /// Slack before the exact end of the list that still counts as "at the tail" for
    /// [`StickEdge::End`] lists.
    pub tail_tolerance: f64,

    /// Debounce for resetting `is_scrolling` after the last scroll event.
    pub is_scrolling_reset_delay_ms: u64,

    pub on_change: Option<OnChangeCallback>,
}

impl Clone for VirtualizerOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            default_item_size: self.default_item_size,
            overscan: self.overscan,
            stick_to: self.stick_to,
            axis: self.axis,
            scroll_margin: self.scroll_margin,
            initial_offset: self.initial_offset.clone(),
            initial_viewport: self.initial_viewport,
            jump_tolerance: self.jump_tolerance,
            echo_tolerance: self.echo_tolerance,
            tail_tolerance: self.tail_tolerance,
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
            on_change: self.on_change.clone(),
        }
    }
}

impl Default for VirtualizerOptions {
    fn default() -> Self {
        Self::new(0, FALLBACK_ITEM_SIZE)
    }
}

impl VirtualizerOptions {
    /// Creates options for `count` items estimated at `default_item_size` each.
    pub fn new(count: usize, default_item_size: f64) -> Self {
        Self {
            count,
            default_item_size,
            overscan: 4,
            stick_to: StickEdge::Start,
            axis: Axis::Vertical,
            scroll_margin: 0.0,
            initial_offset: InitialOffset::default(),
            initial_viewport: None,
            jump_tolerance: 0.0,
            echo_tolerance: 0.5,
            tail_tolerance: 1.0,
            is_scrolling_reset_delay_ms: 150,
            on_change: None,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_stick_to(mut self, stick_to: StickEdge) -> Self {
        self.stick_to = stick_to;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_scroll_margin(mut self, scroll_margin: f64) -> Self {
        self.scroll_margin = scroll_margin;
        self
    }

    pub fn with_initial_offset_value(mut self, initial_offset: f64) -> Self {
        self.initial_offset = InitialOffset::Value(initial_offset);
        self
    }

    pub fn with_initial_offset_provider(
        mut self,
        initial_offset: impl Fn() -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.initial_offset = InitialOffset::Provider(Arc::new(initial_offset));
        self
    }

    /// Sets the viewport extent to assume before the host reports one.
    pub fn with_initial_viewport(mut self, extent: Option<f64>) -> Self {
        self.initial_viewport = extent;
        self
    }

    pub fn with_jump_tolerance(mut self, tolerance: f64) -> Self {
        self.jump_tolerance = tolerance;
        self
    }

    pub fn with_echo_tolerance(mut self, tolerance: f64) -> Self {
        self.echo_tolerance = tolerance;
        self
    }

    pub fn with_tail_tolerance(mut self, tolerance: f64) -> Self {
        self.tail_tolerance = tolerance;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&Virtualizer, bool) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl core::fmt::Debug for VirtualizerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizerOptions")
            .field("count", &self.count)
            .field("default_item_size", &self.default_item_size)
            .field("overscan", &self.overscan)
            .field("stick_to", &self.stick_to)
            .field("axis", &self.axis)
            .field("scroll_margin", &self.scroll_margin)
            .field("initial_offset", &self.initial_offset)
            .field("initial_viewport", &self.initial_viewport)
            .field("jump_tolerance", &self.jump_tolerance)
            .field("echo_tolerance", &self.echo_tolerance)
            .field("tail_tolerance", &self.tail_tolerance)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .finish_non_exhaustive()
    }
}
