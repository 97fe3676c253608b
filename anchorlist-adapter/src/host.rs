use anchorlist::VirtualItem;

/// The host's scroll container.
///
/// Offsets are host coordinates along the scroll axis.
pub trait ScrollSurface {
    /// The container's current scroll position.
    fn scroll_offset(&self) -> f64;

    /// Moves the scroll position by `delta`, instantly and without animation.
    ///
    /// Used for jump compensation: it must take effect before the next paint, and it must not
    /// cancel or restart any momentum scrolling the user has going.
    fn jump_by(&mut self, delta: f64);

    /// Moves the scroll position to `offset` (one tween step or a programmatic jump).
    fn scroll_to(&mut self, offset: f64);
}

/// Produces the host's rendered output for one frame.
pub trait ItemRenderer {
    /// Starts a frame. `content_extent` is the size the scroll container's content must have
    /// (list extent plus `scroll_margin`).
    fn begin(&mut self, content_extent: f64);

    /// Places one materialized item at its engine-computed offset. Called in index order.
    fn place(&mut self, item: VirtualItem);

    fn end(&mut self) {}
}

impl<S: ScrollSurface + ?Sized> ScrollSurface for &mut S {
    fn scroll_offset(&self) -> f64 {
        (**self).scroll_offset()
    }

    fn jump_by(&mut self, delta: f64) {
        (**self).jump_by(delta);
    }

    fn scroll_to(&mut self, offset: f64) {
        (**self).scroll_to(offset);
    }
}
