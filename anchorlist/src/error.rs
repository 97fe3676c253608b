/// Errors reported to collaborators that break the engine's calling contract.
///
/// None of these are fatal: the engine logs the violation, keeps its previous
/// consistent state and carries on rendering.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// A write addressed an index outside `[0, count)`.
    #[error("index {index} is out of bounds for a list of {count} items")]
    InvalidIndex { index: usize, count: usize },

    /// A measurement referenced an index beyond the current count, which means the
    /// mutation that shrank the list was delivered after the measurement was taken.
    /// The measurement is discarded.
    #[error("measurement for index {index} arrived after the list shrank to {count} items")]
    InconsistentMutationOrder { index: usize, count: usize },

    /// A reported size was negative, NaN or infinite. The item keeps its previous size.
    #[error("size {size} reported for index {index} is not a finite non-negative number")]
    NonFiniteSize { index: usize, size: f64 },
}

pub(crate) fn is_valid_size(size: f64) -> bool {
    size.is_finite() && size >= 0.0
}
