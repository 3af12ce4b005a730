use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::stats::Stats;

pub const DEFAULT_CALORIE_LIMIT: i64 = 2000;

/// A named calorie amount logged as either a meal or a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub calories: i64,
}

impl Entry {
    /// Builds an entry with a fresh id. The name must not be blank.
    pub fn new(name: impl Into<String>, calories: i64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LedgerError::Validation("name must not be empty".into()));
        }

        Ok(Self {
            id: Uuid::new_v4().simple().to_string(),
            name,
            calories,
        })
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>, calories: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            calories,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Meal,
    Workout,
}

impl EntryKind {
    /// Total after an entry of this kind joins it, or `None` on overflow.
    pub fn add_to(self, total: i64, calories: i64) -> Option<i64> {
        match self {
            EntryKind::Meal => total.checked_add(calories),
            EntryKind::Workout => total.checked_sub(calories),
        }
    }

    /// Total after an entry of this kind leaves it, or `None` on overflow.
    pub fn take_from(self, total: i64, calories: i64) -> Option<i64> {
        match self {
            EntryKind::Meal => total.checked_sub(calories),
            EntryKind::Workout => total.checked_add(calories),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Meal => "meal",
            EntryKind::Workout => "workout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub calorie_limit: i64,
    pub total_calories: i64,
    pub meals: Vec<Entry>,
    pub workouts: Vec<Entry>,
}

impl LedgerState {
    pub fn with_limit(calorie_limit: i64) -> Self {
        Self {
            calorie_limit,
            total_calories: 0,
            meals: Vec::new(),
            workouts: Vec::new(),
        }
    }

    pub fn entries(&self, kind: EntryKind) -> &[Entry] {
        match kind {
            EntryKind::Meal => &self.meals,
            EntryKind::Workout => &self.workouts,
        }
    }

    pub fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<Entry> {
        match kind {
            EntryKind::Meal => &mut self.meals,
            EntryKind::Workout => &mut self.workouts,
        }
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::with_limit(DEFAULT_CALORIE_LIMIT)
    }
}

/// Amounts arrive from forms as text and from API clients as numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(i64),
    /// Fractional or out-of-range numbers, rejected by validation.
    Float(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    pub name: String,
    pub calories: AmountInput,
}

#[derive(Debug, Deserialize)]
pub struct LimitRequest {
    pub limit: AmountInput,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub removed: Option<Entry>,
    pub stats: Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_gets_unique_hex_id() {
        let first = Entry::new("Eggs", 300).unwrap();
        let second = Entry::new("Eggs", 300).unwrap();
        assert_eq!(first.id.len(), 32);
        assert!(first.id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn new_entry_rejects_blank_name() {
        let err = Entry::new("   ", 100).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn kind_direction_and_overflow() {
        assert_eq!(EntryKind::Meal.add_to(100, 50), Some(150));
        assert_eq!(EntryKind::Workout.add_to(100, 50), Some(50));
        assert_eq!(EntryKind::Meal.take_from(100, 50), Some(50));
        assert_eq!(EntryKind::Workout.take_from(100, 50), Some(150));
        assert_eq!(EntryKind::Meal.add_to(i64::MAX, 1), None);
        assert_eq!(EntryKind::Workout.add_to(0, i64::MIN), None);
    }

    #[test]
    fn amount_input_accepts_any_json_number() {
        let whole: AmountInput = serde_json::from_str("300").unwrap();
        assert!(matches!(whole, AmountInput::Number(300)));
        let fractional: AmountInput = serde_json::from_str("300.5").unwrap();
        assert!(matches!(fractional, AmountInput::Float(v) if v == 300.5));
        let text: AmountInput = serde_json::from_str("\"300\"").unwrap();
        assert!(matches!(text, AmountInput::Text(ref t) if t == "300"));
    }

    #[test]
    fn entry_json_shape_is_stable() {
        let entry = Entry::with_id("abc", "Toast", 120);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": "abc", "name": "Toast", "calories": 120 })
        );
    }
}
