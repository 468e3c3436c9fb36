use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::store::KeyValueStore;

const PROGRESS_FILE: &str = "progress.json";

/// All progress keys in a single JSON object on disk, rewritten atomically
/// after every change.
pub struct JsonStore {
    base_dir: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating data directory {}", base_dir.display()))?;
        let values = Self::load(&base_dir.join(PROGRESS_FILE));
        log::debug!(
            "loaded {} progress keys from {}",
            values.len(),
            base_dir.display()
        );
        Ok(Self { base_dir, values })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self) -> PathBuf {
        self.base_dir.join(PROGRESS_FILE)
    }

    /// A corrupt or unreadable file starts an empty store rather than
    /// refusing to run.
    fn load(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            return BTreeMap::new();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                log::warn!("ignoring unreadable progress file {}: {err}", path.display());
                BTreeMap::new()
            }),
            Err(err) => {
                log::warn!("cannot read progress file {}: {err}", path.display());
                BTreeMap::new()
            }
        }
    }

    fn save(&self) -> Result<()> {
        let path = self.file_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(&self.values)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn set_many(&mut self, entries: &[(String, String)]) -> Result<()> {
        let mut changed = false;
        for (key, value) in entries {
            if self.values.get(key) != Some(value) {
                self.values.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        if !changed {
            return Ok(());
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_values_survive_reopen() {
        let (dir, mut store) = make_test_store();
        store.set("headingsTaskDone0", "true").unwrap();
        store.set("headingsTaskIndex", "1").unwrap();

        let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert!(reopened.get_flag("headingsTaskDone0"));
        assert_eq!(reopened.get_int("headingsTaskIndex"), Some(1));
    }

    #[test]
    fn test_set_many_saves_batch() {
        let (dir, mut store) = make_test_store();
        store
            .set_many(&[
                ("home-row-charIndex".to_string(), "3".to_string()),
                ("home-row-errors".to_string(), "1".to_string()),
            ])
            .unwrap();

        let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get_int("home-row-charIndex"), Some(3));
        assert_eq!(reopened.get_int("home-row-errors"), Some(1));
    }

    #[test]
    fn test_unchanged_batch_skips_save() {
        let (dir, mut store) = make_test_store();
        store.set("k", "v").unwrap();
        store.base_dir = dir.path().join("gone");
        assert!(store.set_many(&[("k".to_string(), "v".to_string())]).is_ok());
        assert!(store.set_many(&[("k".to_string(), "w".to_string())]).is_err());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROGRESS_FILE), "{not json").unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, mut store) = make_test_store();
        store.set("k", "v").unwrap();
        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty(), "no residual .tmp files");
        assert!(dir.path().join(PROGRESS_FILE).exists());
    }

    #[test]
    fn test_set_into_missing_directory_fails() {
        let (dir, mut store) = make_test_store();
        store.base_dir = dir.path().join("gone");
        assert!(store.set("k", "v").is_err());
    }
}
