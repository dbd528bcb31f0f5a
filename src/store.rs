use crate::error::Error;
use crate::models::ClipRecord;

/// Storage seam shared by the monitor (writes) and the picker (reads).
/// Implementations must be safe to call from both threads at once.
pub trait ClipStore: Send + Sync {
    /// Record one captured clip.
    fn append(&self, content: &str) -> Result<(), Error>;

    /// Most recent clips, newest first, capped by the backend. A
    /// non-empty `filter` narrows by substring where the backend
    /// supports search; backends without search ignore it.
    fn recent(&self, filter: &str) -> Result<Vec<ClipRecord>, Error>;
}
