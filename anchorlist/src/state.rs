use alloc::vec::Vec;

/// A lightweight, serializable snapshot of the current viewport geometry.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub extent: f64,
}

/// A lightweight, serializable snapshot of the current scroll state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    /// Scroll offset in host coordinates.
    pub offset: f64,
    pub is_scrolling: bool,
}

/// A combined snapshot of viewport + scroll state.
///
/// Useful for restoring a list across frames or remounts without coupling the engine to any
/// specific UI framework.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    pub scroll: ScrollState,
}

/// Measured item sizes captured from a list, keyed by index.
///
/// Import it into a fresh engine over the same data to restore the layout without waiting for
/// the host to re-measure every item.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeCache {
    pub default_item_size: f64,
    /// `(index, measured size)` pairs in ascending index order.
    pub measured: Vec<(usize, f64)>,
}

impl SizeCache {
    pub fn len(&self) -> usize {
        self.measured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measured.is_empty()
    }
}
