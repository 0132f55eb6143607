use chrono::{DateTime, Local};
use interchange::{LockState, Preview};

/// What a listing shows for one stored map.
#[derive(Clone, Debug)]
pub struct DocumentSummary {
    /// Storage key, taken from the file name.
    pub key: String,
    /// Root name recorded inside the blob. Differs from `key` only when the
    /// file was renamed outside the store.
    pub name: String,
    pub state: LockState,
    pub modified: Option<DateTime<Local>>,
    pub preview: Preview,
}

impl DocumentSummary {
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }
}
