use serde::{Deserialize, Serialize};

/// Represents a file's content hash for incremental indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHash {
    file_path: String,
    content_hash: String,
    index_name: String,
}

impl FileHash {
    pub fn new(file_path: String, content_hash: String, index_name: String) -> Self {
        Self {
            file_path,
            content_hash,
            index_name,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }
}

/// Computes SHA-256 hash of file content.
pub fn compute_file_hash(content: &str) -> String {
    use sha2::{Digest, Sha256};
    let hash = Sha256::digest(content.as_bytes());
    format!("{:x}", hash)
}
