//! The calorie ledger: single owner of the in-memory state.
//!
//! Every mutation is written to the `PersistenceStore` first and only then
//! applied in memory, so a failed write leaves both copies as they were.
//! After each successful mutation the registered observers are called, in
//! registration order, with the event and fresh stats.

use crate::errors::{LedgerError, Result};
use crate::models::{DEFAULT_CALORIE_LIMIT, Entry, EntryKind, LedgerState};
use crate::stats::{Stats, build_stats, saturating_sum};
use crate::storage::PersistenceStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Loaded,
    MealAdded(Entry),
    WorkoutAdded(Entry),
    MealRemoved(Entry),
    WorkoutRemoved(Entry),
    Reset,
    LimitChanged { previous: i64, current: i64 },
}

impl LedgerEvent {
    fn added(kind: EntryKind, entry: Entry) -> Self {
        match kind {
            EntryKind::Meal => LedgerEvent::MealAdded(entry),
            EntryKind::Workout => LedgerEvent::WorkoutAdded(entry),
        }
    }

    fn removed(kind: EntryKind, entry: Entry) -> Self {
        match kind {
            EntryKind::Meal => LedgerEvent::MealRemoved(entry),
            EntryKind::Workout => LedgerEvent::WorkoutRemoved(entry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerChange {
    pub event: LedgerEvent,
    pub stats: Stats,
}

pub trait LedgerObserver: Send {
    fn on_change(&mut self, change: &LedgerChange);
}

impl<F> LedgerObserver for F
where
    F: FnMut(&LedgerChange) + Send,
{
    fn on_change(&mut self, change: &LedgerChange) {
        self(change)
    }
}

/// Observer that traces every change.
pub fn trace_change(change: &LedgerChange) {
    debug!(
        event = ?change.event,
        total = change.stats.total,
        remaining = change.stats.remaining,
        "ledger changed"
    );
}

pub struct CalorieLedger {
    store: PersistenceStore,
    state: LedgerState,
    default_limit: i64,
    observers: Vec<Box<dyn LedgerObserver>>,
}

impl CalorieLedger {
    pub fn new(store: PersistenceStore) -> Self {
        Self::with_default_limit(store, DEFAULT_CALORIE_LIMIT)
    }

    /// Creates an empty ledger. Nothing is read from the store until
    /// [`CalorieLedger::initialize`] runs.
    pub fn with_default_limit(store: PersistenceStore, default_limit: i64) -> Self {
        Self {
            store,
            state: LedgerState::with_limit(default_limit),
            default_limit,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl LedgerObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Loads limit, total and both collections from the store.
    ///
    /// A stored total that disagrees with the loaded collections (for example
    /// after a corrupt collection was dropped) is recomputed and written back.
    pub fn initialize(&mut self) -> Result<LedgerChange> {
        let calorie_limit = self.store.get_calorie_limit(self.default_limit)?;
        let stored_total = self.store.get_total_calories(0)?;
        let meals = self.store.get_meals()?;
        let workouts = self.store.get_workouts()?;

        let expected = saturating_sum(&meals).saturating_sub(saturating_sum(&workouts));
        let total_calories = if stored_total == expected {
            stored_total
        } else {
            warn!("stored total {stored_total} does not match entries ({expected}); repairing");
            self.store.update_total_calories(expected)?;
            expected
        };

        self.state = LedgerState {
            calorie_limit,
            total_calories,
            meals,
            workouts,
        };
        info!(
            limit = calorie_limit,
            total = total_calories,
            meals = self.state.meals.len(),
            workouts = self.state.workouts.len(),
            "ledger loaded"
        );

        Ok(self.notify(LedgerEvent::Loaded))
    }

    pub fn add_meal(&mut self, meal: Entry) -> Result<LedgerChange> {
        self.add_entry(EntryKind::Meal, meal)
    }

    pub fn remove_meal(&mut self, id: &str) -> Result<Option<LedgerChange>> {
        self.remove_entry(EntryKind::Meal, id)
    }

    pub fn add_workout(&mut self, workout: Entry) -> Result<LedgerChange> {
        self.add_entry(EntryKind::Workout, workout)
    }

    pub fn remove_workout(&mut self, id: &str) -> Result<Option<LedgerChange>> {
        self.remove_entry(EntryKind::Workout, id)
    }

    pub fn add_entry(&mut self, kind: EntryKind, entry: Entry) -> Result<LedgerChange> {
        if self.state.entries(kind).iter().any(|e| e.id == entry.id) {
            return Err(LedgerError::Validation(format!(
                "{} id {} already exists",
                kind.label(),
                entry.id
            )));
        }

        let total = kind
            .add_to(self.state.total_calories, entry.calories)
            .ok_or_else(|| total_overflow(kind, entry.calories))?;
        self.store.update_total_calories(total)?;
        self.store.save_entry(kind, &entry)?;

        self.state.total_calories = total;
        self.state.entries_mut(kind).push(entry.clone());

        Ok(self.notify(LedgerEvent::added(kind, entry)))
    }

    /// Removes the first entry with `id`. An unknown id changes nothing and
    /// returns `None`.
    pub fn remove_entry(&mut self, kind: EntryKind, id: &str) -> Result<Option<LedgerChange>> {
        let Some(idx) = self.state.entries(kind).iter().position(|e| e.id == id) else {
            warn!("no {} with id {id}; nothing to remove", kind.label());
            return Ok(None);
        };

        let calories = self.state.entries(kind)[idx].calories;
        let total = kind
            .take_from(self.state.total_calories, calories)
            .ok_or_else(|| total_overflow(kind, calories))?;
        self.store.update_total_calories(total)?;
        self.store.remove_entry(kind, id)?;

        self.state.total_calories = total;
        let entry = self.state.entries_mut(kind).remove(idx);

        Ok(Some(self.notify(LedgerEvent::removed(kind, entry))))
    }

    /// Clears both collections and the total. The limit is kept.
    pub fn reset(&mut self) -> Result<LedgerChange> {
        self.store.clear_all()?;

        self.state.total_calories = 0;
        self.state.meals.clear();
        self.state.workouts.clear();
        info!("ledger reset");

        Ok(self.notify(LedgerEvent::Reset))
    }

    pub fn set_calorie_limit(&mut self, limit: i64) -> Result<LedgerChange> {
        self.store.set_calorie_limit(limit)?;

        let previous = std::mem::replace(&mut self.state.calorie_limit, limit);
        info!(previous, current = limit, "calorie limit changed");

        Ok(self.notify(LedgerEvent::LimitChanged {
            previous,
            current: limit,
        }))
    }

    pub fn stats(&self) -> Stats {
        build_stats(&self.state)
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn meals(&self) -> &[Entry] {
        &self.state.meals
    }

    pub fn workouts(&self) -> &[Entry] {
        &self.state.workouts
    }

    pub fn entries(&self, kind: EntryKind) -> &[Entry] {
        self.state.entries(kind)
    }

    /// Entries whose name contains `query`, ignoring case. A blank query
    /// matches everything.
    pub fn filter_entries(&self, kind: EntryKind, query: &str) -> Vec<Entry> {
        let needle = query.trim().to_lowercase();
        self.entries(kind)
            .iter()
            .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    fn notify(&mut self, event: LedgerEvent) -> LedgerChange {
        let change = LedgerChange {
            event,
            stats: self.stats(),
        };
        for observer in &mut self.observers {
            observer.on_change(&change);
        }
        change
    }
}

fn total_overflow(kind: EntryKind, calories: i64) -> LedgerError {
    LedgerError::Validation(format!(
        "{} of {calories} calories is out of range for the daily total",
        kind.label()
    ))
}
