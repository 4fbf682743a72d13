use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// An indexed repository: a name, its canonical on-disk path, and the
/// indexing lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub canonical_path: String,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    Indexing,
    Indexed,
    Error,
}

/// An index left in `Indexing` for longer than this is presumed to belong
/// to a crashed indexing run and is surfaced as `Error` on next read,
/// rather than blocking re-indexing forever.
pub const STUCK_INDEXING_TIMEOUT: Duration = Duration::from_secs(15 * 60);

impl Index {
    pub fn new(name: impl Into<String>, canonical_path: impl Into<String>) -> Self {
        let now = SystemTime::now();
        Self {
            name: name.into(),
            canonical_path: canonical_path.into(),
            created_at: now,
            updated_at: now,
            status: IndexStatus::Indexing,
        }
    }

    /// Effective status: an index stuck `Indexing` past
    /// [`STUCK_INDEXING_TIMEOUT`] reads as `Error` even though the stored
    /// row still says `Indexing`.
    pub fn effective_status(&self) -> IndexStatus {
        if self.status == IndexStatus::Indexing {
            if let Ok(elapsed) = self.updated_at.elapsed() {
                if elapsed > STUCK_INDEXING_TIMEOUT {
                    return IndexStatus::Error;
                }
            }
        }
        self.status
    }
}
