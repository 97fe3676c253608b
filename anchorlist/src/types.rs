/// The scroll axis a list is virtualized along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

impl Axis {
    /// Picks the extent along this axis out of a `width`/`height` pair.
    pub fn main(self, width: f64, height: f64) -> f64 {
        match self {
            Self::Vertical => height,
            Self::Horizontal => width,
        }
    }
}

/// Which viewport edge the scroll anchor is measured from.
///
/// `Start` keeps the leading visible item in place (feeds, documents). `End` keeps the trailing
/// visible item glued to the viewport's trailing edge (chats, logs), and follows the tail when the
/// viewport was already at the end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StickEdge {
    #[default]
    Start,
    End,
}

/// Provenance of an item size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeSource {
    /// A placeholder (the default size or a caller-supplied estimate).
    #[default]
    Estimated,
    /// A size observed by the host's layout pass.
    Measured,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Scroll the minimum distance needed to bring the item fully into view.
    Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Where a scroll notification came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollSource {
    /// Wheel, drag, keyboard or any other input the engine did not ask for.
    User,
    /// The host tagged this notification as the echo of a movement the engine requested.
    Programmatic,
}

/// A contiguous, non-empty run of items to materialize.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize, // inclusive
    /// Offset of `start_index` in list space.
    pub start_offset: f64,
}

impl VisibleRange {
    pub fn count(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }

    /// Iterates the indexes in ascending order.
    pub fn indexes(&self) -> core::ops::RangeInclusive<usize> {
        self.start_index..=self.end_index
    }

    /// Compares index bounds only.
    pub fn same_indexes(&self, other: &Self) -> bool {
        self.start_index == other.start_index && self.end_index == other.end_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VirtualItem {
    pub index: usize,
    /// Start offset in the scroll axis, in host coordinates (includes `scroll_margin`).
    pub start: f64,
    pub size: f64,
    pub measured: bool,
}

impl VirtualItem {
    pub fn end(&self) -> f64 {
        self.start + self.size
    }
}
