//! Durable key-value storage for the ledger.
//!
//! `KeyValueStore` is the raw string-to-string seam (a browser's local
//! storage, a JSON file, or an in-memory map). `PersistenceStore` layers the
//! four typed records on top of it and owns their encoding.

use crate::errors::{LedgerError, Result};
use crate::models::{Entry, EntryKind};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{error, warn};

pub const CALORIE_LIMIT_KEY: &str = "calorieLimit";
pub const TOTAL_CALORIES_KEY: &str = "totalCalories";
pub const MEALS_KEY: &str = "meals";
pub const WORKOUTS_KEY: &str = "workouts";

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store. Clones share the same map, so a clone handed to a second
/// ledger sees everything the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// A JSON object on disk mapping record keys to their encoded values.
///
/// The file is read once on open and rewritten in full on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let items = load_items(&path);
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let payload = serde_json::to_vec_pretty(&self.items)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload).map_err(|err| {
            error!("failed to write {}: {err}", tmp.display());
            LedgerError::from(err)
        })?;
        fs::rename(&tmp, &self.path).map_err(|err| {
            error!("failed to replace {}: {err}", self.path.display());
            LedgerError::from(err)
        })?;
        Ok(())
    }
}

fn load_items(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(err) => {
                error!("failed to parse data file {}: {err}", path.display());
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read data file {}: {err}", path.display());
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.items.insert(key.to_string(), value.to_string());
        if let Err(err) = self.flush() {
            match previous {
                Some(old) => self.items.insert(key.to_string(), old),
                None => self.items.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.items.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.flush() {
            self.items.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }
}

/// Typed access to the calorie limit, the running total and the two entry
/// collections.
pub struct PersistenceStore {
    backend: Box<dyn KeyValueStore>,
}

impl PersistenceStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Stored limit, or `default` when nothing (or garbage) is stored.
    /// The default is not written back.
    pub fn get_calorie_limit(&self, default: i64) -> Result<i64> {
        self.get_number(CALORIE_LIMIT_KEY, default)
    }

    pub fn set_calorie_limit(&mut self, limit: i64) -> Result<()> {
        self.backend.set(CALORIE_LIMIT_KEY, &limit.to_string())
    }

    pub fn get_total_calories(&self, default: i64) -> Result<i64> {
        self.get_number(TOTAL_CALORIES_KEY, default)
    }

    pub fn update_total_calories(&mut self, total: i64) -> Result<()> {
        self.backend.set(TOTAL_CALORIES_KEY, &total.to_string())
    }

    pub fn get_meals(&self) -> Result<Vec<Entry>> {
        self.get_entries(EntryKind::Meal)
    }

    pub fn save_meal(&mut self, meal: &Entry) -> Result<()> {
        self.save_entry(EntryKind::Meal, meal)
    }

    pub fn remove_meal(&mut self, id: &str) -> Result<()> {
        self.remove_entry(EntryKind::Meal, id)
    }

    pub fn get_workouts(&self) -> Result<Vec<Entry>> {
        self.get_entries(EntryKind::Workout)
    }

    pub fn save_workout(&mut self, workout: &Entry) -> Result<()> {
        self.save_entry(EntryKind::Workout, workout)
    }

    pub fn remove_workout(&mut self, id: &str) -> Result<()> {
        self.remove_entry(EntryKind::Workout, id)
    }

    /// Reads a collection, failing with `CorruptState` when the stored value
    /// does not decode.
    pub fn try_get_entries(&self, kind: EntryKind) -> Result<Vec<Entry>> {
        let key = entries_key(kind);
        match self.backend.get(key)? {
            None => Ok(Vec::new()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|err| LedgerError::CorruptState {
                    key: key.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Reads a collection, treating a corrupt value as empty.
    pub fn get_entries(&self, kind: EntryKind) -> Result<Vec<Entry>> {
        match self.try_get_entries(kind) {
            Err(err @ LedgerError::CorruptState { .. }) => {
                warn!("{err}; starting with no {}s", kind.label());
                Ok(Vec::new())
            }
            other => other,
        }
    }

    pub fn save_entry(&mut self, kind: EntryKind, entry: &Entry) -> Result<()> {
        let mut entries = self.get_entries(kind)?;
        entries.push(entry.clone());
        self.write_entries(kind, &entries)
    }

    pub fn remove_entry(&mut self, kind: EntryKind, id: &str) -> Result<()> {
        let mut entries = self.get_entries(kind)?;
        if let Some(idx) = entries.iter().position(|entry| entry.id == id) {
            entries.remove(idx);
        }
        self.write_entries(kind, &entries)
    }

    /// Drops meals, workouts and the total. The limit survives.
    pub fn clear_all(&mut self) -> Result<()> {
        for key in [MEALS_KEY, WORKOUTS_KEY, TOTAL_CALORIES_KEY] {
            self.backend.remove(key)?;
        }
        Ok(())
    }

    fn write_entries(&mut self, kind: EntryKind, entries: &[Entry]) -> Result<()> {
        let payload = serde_json::to_string(entries)?;
        self.backend.set(entries_key(kind), &payload)
    }

    fn get_number(&self, key: &str, default: i64) -> Result<i64> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<i64>() {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!("stored {key} {raw:?} is not a number ({err}); using {default}");
                Ok(default)
            }
        }
    }
}

fn entries_key(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Meal => MEALS_KEY,
        EntryKind::Workout => WORKOUTS_KEY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_data_path() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("calorie_tracker_store_{}_{}", std::process::id(), nanos));
        path.push("state.json");
        path
    }

    #[test]
    fn scalars_default_without_writing() {
        let backend = MemoryStore::new();
        let store = PersistenceStore::new(backend.clone());
        assert_eq!(store.get_calorie_limit(2000).unwrap(), 2000);
        assert_eq!(store.get_total_calories(0).unwrap(), 0);
        assert!(backend.is_empty());
    }

    #[test]
    fn scalars_round_trip_and_survive_garbage() {
        let mut backend = MemoryStore::new();
        let mut store = PersistenceStore::new(backend.clone());
        store.set_calorie_limit(1800).unwrap();
        store.update_total_calories(-250).unwrap();
        assert_eq!(store.get_calorie_limit(2000).unwrap(), 1800);
        assert_eq!(store.get_total_calories(0).unwrap(), -250);

        backend.set(CALORIE_LIMIT_KEY, "lots").unwrap();
        assert_eq!(store.get_calorie_limit(2000).unwrap(), 2000);
    }

    #[test]
    fn save_and_remove_entries() {
        let mut store = PersistenceStore::new(MemoryStore::new());
        assert!(store.get_meals().unwrap().is_empty());

        let eggs = Entry::with_id("a", "Eggs", 300);
        let toast = Entry::with_id("b", "Toast", 120);
        store.save_meal(&eggs).unwrap();
        store.save_meal(&toast).unwrap();
        store.save_workout(&Entry::with_id("a", "Run", 400)).unwrap();

        assert_eq!(store.get_meals().unwrap(), vec![eggs.clone(), toast.clone()]);

        store.remove_meal("a").unwrap();
        store.remove_meal("missing").unwrap();
        assert_eq!(store.get_meals().unwrap(), vec![toast]);
        assert_eq!(store.get_workouts().unwrap().len(), 1);

        store.remove_workout("a").unwrap();
        assert!(store.get_workouts().unwrap().is_empty());
    }

    #[test]
    fn corrupt_collection_is_reported_then_recovered() {
        let mut backend = MemoryStore::new();
        backend.set(MEALS_KEY, "[{\"id\":").unwrap();
        let mut store = PersistenceStore::new(backend.clone());

        let err = store.try_get_entries(EntryKind::Meal).unwrap_err();
        assert!(matches!(err, LedgerError::CorruptState { ref key, .. } if key == MEALS_KEY));
        assert!(store.get_meals().unwrap().is_empty());

        store.save_meal(&Entry::with_id("x", "Soup", 90)).unwrap();
        assert_eq!(store.get_meals().unwrap().len(), 1);
    }

    #[test]
    fn clear_all_keeps_limit() {
        let backend = MemoryStore::new();
        let mut store = PersistenceStore::new(backend.clone());
        store.set_calorie_limit(2500).unwrap();
        store.update_total_calories(300).unwrap();
        store.save_meal(&Entry::with_id("a", "Eggs", 300)).unwrap();
        store.save_workout(&Entry::with_id("b", "Walk", 100)).unwrap();

        store.clear_all().unwrap();

        assert_eq!(backend.len(), 1);
        assert_eq!(store.get_calorie_limit(2000).unwrap(), 2500);
        assert_eq!(store.get_total_calories(0).unwrap(), 0);
        assert!(store.get_meals().unwrap().is_empty());
        assert!(store.get_workouts().unwrap().is_empty());
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let path = unique_data_path();
        {
            let mut store = PersistenceStore::new(FileStore::open(&path).unwrap());
            store.set_calorie_limit(2200).unwrap();
            store.save_meal(&Entry::with_id("a", "Eggs", 300)).unwrap();
        }

        let store = PersistenceStore::new(FileStore::open(&path).unwrap());
        assert_eq!(store.get_calorie_limit(2000).unwrap(), 2200);
        assert_eq!(store.get_meals().unwrap(), vec![Entry::with_id("a", "Eggs", 300)]);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn file_store_starts_empty_on_corrupt_file() {
        let path = unique_data_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"not json at all").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(MEALS_KEY).unwrap(), None);
        assert_eq!(store.path(), path.as_path());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
