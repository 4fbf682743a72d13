//! C12 support: a bounded, thread-safe LRU of parsed files keyed by path,
//! so repeated context-expansion requests against the same file in one
//! search session don't re-parse it every time.

use std::sync::Mutex;

use lru::LruCache;
use std::num::NonZeroUsize;

use super::scopes::{collect_scopes, Scope};

const CAPACITY: usize = 128;

pub struct FileCache {
    inner: Mutex<LruCache<String, Vec<Scope>>>,
}

impl FileCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LruCache::new(NonZeroUsize::new(CAPACITY).unwrap())),
        }
    }

    /// Returns the cached scope list for `path`, computing and caching it
    /// from `content`/`extension` on a miss.
    pub fn scopes_for(&self, path: &str, content: &str, extension: &str) -> Vec<Scope> {
        let mut cache = self.inner.lock().expect("file cache mutex poisoned");
        if let Some(scopes) = cache.get(path) {
            return scopes.clone();
        }
        let scopes = collect_scopes(content, extension);
        cache.put(path.to_string(), scopes.clone());
        scopes
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_across_repeated_lookups() {
        let cache = FileCache::new();
        let content = "fn foo() {\n    1\n}\n";
        let first = cache.scopes_for("a.rs", content, "rs");
        let second = cache.scopes_for("a.rs", content, "rs");
        assert_eq!(first, second);
    }
}
