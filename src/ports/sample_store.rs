use crate::domain::TelemetrySample;

/// Port for the bounded sample history.
///
/// Implementations return owned snapshots rather than references: readers
/// must never hold a view into storage that an append could tear.
pub trait SampleStore: Send + Sync {
    /// Append a sample, evicting the oldest entry if at capacity.
    /// Returns the number of samples stored afterwards.
    fn append(&self, sample: TelemetrySample) -> usize;

    /// The most recently appended sample, if any.
    fn latest(&self) -> Option<TelemetrySample>;

    /// The last `min(limit, len)` samples, oldest first.
    fn window(&self, limit: usize) -> Vec<TelemetrySample>;

    /// Number of samples currently stored.
    fn len(&self) -> usize;

    /// Maximum number of samples retained.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
