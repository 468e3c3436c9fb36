pub mod json_store;
pub mod keys;

use std::collections::HashMap;

use anyhow::Result;

/// String-keyed, string-valued progress storage.
///
/// Reads never fail: a missing or unreadable value is `None`. Writes may
/// fail on disk-backed stores; callers log and carry on.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// `true` only when the stored value is exactly `"true"`.
    /// Write several values at once. Disk-backed stores save once for the
    /// whole batch.
    fn set_many(&mut self, entries: &[(String, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    fn get_flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Write and log on failure. Progress writes are best-effort.
    fn put(&mut self, key: &str, value: &str) {
        if let Err(err) = self.set(key, value) {
            log::warn!("failed to persist {key}: {err:#}");
        }
    }

    fn put_many(&mut self, entries: &[(String, String)]) {
        if let Err(err) = self.set_many(entries) {
            log::warn!("failed to persist {} values: {err:#}", entries.len());
        }
    }
}

/// Volatile store used when no data directory is available, and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_requires_exact_true() {
        let mut store = MemoryStore::new();
        store.put("a", "true");
        store.put("b", "TRUE");
        store.put("c", "1");
        assert!(store.get_flag("a"));
        assert!(!store.get_flag("b"));
        assert!(!store.get_flag("c"));
        assert!(!store.get_flag("missing"));
    }

    #[test]
    fn test_int_parse_defaults_to_none() {
        let mut store = MemoryStore::new();
        store.put("n", " 42 ");
        store.put("bad", "forty");
        assert_eq!(store.get_int("n"), Some(42));
        assert_eq!(store.get_int("bad"), None);
        assert_eq!(store.get_int("missing"), None);
    }
}
