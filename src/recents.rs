//! Recently viewed Pokémon, most recent first, persisted as a JSON array.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tempfile::NamedTempFile;

use crate::error::{DexError, Result};

pub const MAX_RECENTS: usize = 6;

/// Shown when nothing has been viewed yet.
pub const DEFAULT_RECENTS: [&str; 6] = [
    "pikachu",
    "bulbasaur",
    "charmander",
    "gyarados",
    "gengar",
    "dragonite",
];

/// Names as the API spells them: lowercase ASCII, digits and hyphens.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Move `name` to the front of `list`, dropping the oldest entries beyond `capacity`.
pub fn push_recent(list: &mut Vec<String>, name: &str, capacity: usize) {
    list.retain(|n| n != name);
    list.insert(0, name.to_string());
    list.truncate(capacity);
}

/// Clones share one lock around each read-modify-write of the file.
#[derive(Debug, Clone)]
pub struct RecentsStore {
    path: PathBuf,
    capacity: usize,
    lock: Arc<Mutex<()>>,
}

impl RecentsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            capacity: MAX_RECENTS,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored list. A missing file is an empty list; an unreadable
    /// or unparsable one is an error.
    pub fn load(&self) -> Result<Vec<String>> {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str::<Vec<String>>(&data).map_err(|source| DexError::CorruptRecents {
            path: self.path.clone(),
            source,
        })
    }

    /// Like [`load`](Self::load), but problems are logged and read as empty.
    pub fn get(&self) -> Vec<String> {
        self.load().unwrap_or_else(|e| {
            log::warn!("ignoring recents: {}", e);
            Vec::new()
        })
    }

    /// Record `name` as the most recent entry. Invalid names are ignored.
    pub fn add(&self, name: &str) -> Result<()> {
        if !is_valid_name(name) {
            log::debug!("not recording invalid name {:?}", name);
            return Ok(());
        }
        let _guard = self.lock();
        let mut list = self.get();
        push_recent(&mut list, name, self.capacity);
        self.save(&list)
    }

    /// Remove the stored list entirely.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, list: &[String]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string(list)?.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| DexError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, RecentsStore) {
        let dir = TempDir::new().unwrap();
        let store = RecentsStore::new(dir.path().join("nested").join("recents.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().is_empty());
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_error_but_get_is_empty() {
        let (_dir, store) = store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(
            store.load(),
            Err(DexError::CorruptRecents { .. })
        ));
        assert!(store.get().is_empty());
    }

    #[test]
    fn test_add_twice_keeps_single_front_entry() {
        let (_dir, store) = store();
        store.add("bulbasaur").unwrap();
        store.add("pikachu").unwrap();
        store.add("pikachu").unwrap();
        assert_eq!(store.get(), vec!["pikachu", "bulbasaur"]);
    }

    #[test]
    fn test_readding_moves_to_front() {
        let (_dir, store) = store();
        for name in ["a", "b", "c"] {
            store.add(name).unwrap();
        }
        store.add("a").unwrap();
        assert_eq!(store.get(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_seventh_name_drops_oldest() {
        let (_dir, store) = store();
        for name in ["one", "two", "three", "four", "five", "six", "seven"] {
            store.add(name).unwrap();
        }
        let list = store.get();
        assert_eq!(list.len(), MAX_RECENTS);
        assert_eq!(list[0], "seven");
        assert!(!list.contains(&"one".to_string()));
        assert!(list.contains(&"two".to_string()));
    }

    #[test]
    fn test_invalid_names_ignored() {
        let (_dir, store) = store();
        store.add("").unwrap();
        store.add("Pikachu").unwrap();
        store.add("mr mime").unwrap();
        assert!(store.get().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_clear_removes_file() {
        let (_dir, store) = store();
        store.add("mew").unwrap();
        assert!(store.path().exists());
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_concurrent_adds_keep_both_names() {
        let (_dir, store) = store();
        for _ in 0..50 {
            store.clear().unwrap();
            std::thread::scope(|s| {
                let a = store.clone();
                s.spawn(move || a.add("alpha").unwrap());
                s.spawn(|| store.add("beta").unwrap());
            });
            let list = store.get();
            assert_eq!(list.len(), 2, "lost an update: {:?}", list);
        }
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("mr-mime"));
        assert!(is_valid_name("porygon2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("Eevee"));
    }
}
