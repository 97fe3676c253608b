use anchorlist::{Align, Error, ScrollInput, Virtualizer, VirtualizerOptions};

use crate::{Easing, ItemRenderer, ScrollSurface, Tween};

/// A framework-neutral controller that wraps an `anchorlist::Virtualizer` and runs the per-frame
/// host workflow (corrections, tween-driven scrolling, rendering).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_viewport_rect` / `on_scroll` / `on_measured` when UI events occur
/// - `tick(now_ms, surface)` each frame, before painting
/// - `render(renderer)` to emit the materialized items
#[derive(Clone, Debug)]
pub struct Controller {
    v: Virtualizer,
    tween: Option<Tween>,
    hidden: bool,
}

impl Controller {
    pub fn new(options: VirtualizerOptions) -> Self {
        Self::from_virtualizer(Virtualizer::new(options))
    }

    pub fn from_virtualizer(v: Virtualizer) -> Self {
        Self {
            v,
            tween: None,
            hidden: false,
        }
    }

    pub fn virtualizer(&self) -> &Virtualizer {
        &self.v
    }

    pub fn virtualizer_mut(&mut self) -> &mut Virtualizer {
        &mut self.v
    }

    pub fn into_virtualizer(self) -> Virtualizer {
        self.v
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Marks the list as hidden (e.g. `display: none` or a collapsed panel).
    ///
    /// While hidden, hosts report zero sizes for everything. Those observations are dropped so
    /// the list comes back with its previous layout and scroll position.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Call this when the scroll container is resized. Returns the applied correction.
    pub fn on_viewport_rect(&mut self, width: f64, height: f64) -> f64 {
        if self.hidden && self.v.axis().main(width, height) <= 0.0 {
            return 0.0;
        }
        self.v.set_viewport_rect(width, height)
    }

    /// Call this when the host measured a materialized item. Returns the applied correction.
    pub fn on_measured(&mut self, index: usize, width: f64, height: f64) -> Result<f64, Error> {
        if self.hidden && self.v.axis().main(width, height) <= 0.0 {
            return Ok(0.0);
        }
        self.v.measure_rect(index, width, height)
    }

    /// Call this when the UI reports a scroll offset change.
    ///
    /// Echoes of the controller's own movements are ignored; real user input cancels any active
    /// tween.
    pub fn on_scroll(&mut self, scroll_offset: f64, now_ms: u64) -> ScrollInput {
        let input = self.v.apply_scroll_event(scroll_offset, now_ms);
        if matches!(input, ScrollInput::Applied | ScrollInput::Deferred) {
            self.cancel_animation();
        }
        input
    }

    /// Advances the controller. Call once per frame, before painting.
    ///
    /// - A pending correction is applied with [`ScrollSurface::jump_by`]. A running tween is
    ///   shifted by the same delta so it keeps heading for the same content.
    /// - If a tween is active, it moves the surface with [`ScrollSurface::scroll_to`].
    /// - Otherwise, runs `is_scrolling` debouncing.
    ///
    /// Returns the new offset if the surface was moved.
    pub fn tick(&mut self, now_ms: u64, surface: &mut impl ScrollSurface) -> Option<f64> {
        let Some(mut tween) = self.tween else {
            self.v.update_scrolling(now_ms);
            let delta = self.v.take_pending_correction()?;
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "anchorlist_adapter", delta, "tick: jump_by");
            surface.jump_by(delta);
            return Some(self.v.scroll_offset());
        };

        let correction = self.v.pending_correction();
        if correction != 0.0 {
            tween.shift(correction);
        }
        let target = self.v.scroll_to_offset(tween.sample(now_ms));
        if self.v.take_pending_correction().is_some() {
            surface.scroll_to(target);
        }

        if tween.is_done(now_ms) {
            self.tween = None;
            self.v.set_is_scrolling(false);
        } else {
            self.tween = Some(tween);
        }

        Some(target)
    }

    /// Emits the content extent and every materialized item to `renderer`.
    pub fn render(&self, renderer: &mut impl ItemRenderer) {
        let margin = self.v.options().scroll_margin.max(0.0);
        renderer.begin(margin + self.v.total_extent());
        self.v.for_each_virtual_item(|item| renderer.place(item));
        renderer.end();
    }

    /// Scrolls to an index immediately (no animation). The surface moves on the next `tick`.
    ///
    /// Returns the applied (clamped) offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> f64 {
        self.cancel_animation();
        self.v.scroll_to_index(index, align)
    }

    /// Starts a tween to an index (adapter-driven).
    ///
    /// Returns the clamped target offset.
    pub fn start_tween_to_index(
        &mut self,
        index: usize,
        align: Align,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> f64 {
        let to = self.v.scroll_to_index_offset(index, align);
        self.start_tween_to_offset(to, now_ms, duration_ms, easing)
    }

    /// Starts a tween to an offset (adapter-driven).
    ///
    /// Returns the clamped target offset.
    pub fn start_tween_to_offset(
        &mut self,
        offset: f64,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> f64 {
        let to = self.v.clamp_scroll_offset(offset);
        let from = self.v.scroll_offset();
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "anchorlist_adapter", from, to, duration_ms, "start_tween");
        self.tween = Some(Tween::new(from, to, now_ms, duration_ms, easing));
        self.v.notify_scroll_event(now_ms);
        to
    }
}
