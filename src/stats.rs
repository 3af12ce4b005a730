use crate::models::{Entry, LedgerState};
use serde::{Deserialize, Serialize};

/// Display values derived from the ledger on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub limit: i64,
    pub total: i64,
    pub consumed: i64,
    pub burned: i64,
    pub remaining: i64,
    pub progress_percent: f64,
    pub over_limit: bool,
}

pub fn build_stats(state: &LedgerState) -> Stats {
    let consumed = saturating_sum(&state.meals);
    let burned = saturating_sum(&state.workouts);
    let remaining = state.calorie_limit.saturating_sub(state.total_calories);

    Stats {
        limit: state.calorie_limit,
        total: state.total_calories,
        consumed,
        burned,
        remaining,
        progress_percent: progress_percent(state.total_calories, state.calorie_limit),
        over_limit: remaining <= 0,
    }
}

pub fn saturating_sum(entries: &[Entry]) -> i64 {
    entries
        .iter()
        .fold(0i64, |acc, entry| acc.saturating_add(entry.calories))
}

pub fn progress_percent(total: i64, limit: i64) -> f64 {
    if limit <= 0 {
        return if total > 0 { 100.0 } else { 0.0 };
    }

    (total as f64 / limit as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(limit: i64, meals: &[i64], workouts: &[i64]) -> LedgerState {
        let mut state = LedgerState::with_limit(limit);
        for (idx, calories) in meals.iter().enumerate() {
            state.meals.push(Entry::with_id(format!("m{idx}"), "meal", *calories));
            state.total_calories += calories;
        }
        for (idx, calories) in workouts.iter().enumerate() {
            state.workouts.push(Entry::with_id(format!("w{idx}"), "workout", *calories));
            state.total_calories -= calories;
        }
        state
    }

    #[test]
    fn single_meal_against_default_limit() {
        let stats = build_stats(&state(2000, &[300], &[]));
        assert_eq!(stats.total, 300);
        assert_eq!(stats.consumed, 300);
        assert_eq!(stats.burned, 0);
        assert_eq!(stats.remaining, 1700);
        assert_eq!(stats.progress_percent, 15.0);
        assert!(!stats.over_limit);
    }

    #[test]
    fn negative_total_clamps_progress_to_zero() {
        let stats = build_stats(&state(2000, &[300], &[400]));
        assert_eq!(stats.total, -100);
        assert_eq!(stats.remaining, 2100);
        assert_eq!(stats.progress_percent, 0.0);
    }

    #[test]
    fn progress_caps_at_one_hundred() {
        let stats = build_stats(&state(1000, &[800, 700], &[]));
        assert_eq!(stats.progress_percent, 100.0);
        assert_eq!(stats.remaining, -500);
        assert!(stats.over_limit);
    }

    #[test]
    fn extreme_amounts_saturate() {
        let mut state = LedgerState::with_limit(i64::MIN);
        state.meals.push(Entry::with_id("a", "huge", i64::MAX));
        state.meals.push(Entry::with_id("b", "huge", i64::MAX));
        state.total_calories = i64::MAX;

        let stats = build_stats(&state);
        assert_eq!(stats.consumed, i64::MAX);
        assert_eq!(stats.remaining, i64::MIN);
        assert_eq!(stats.progress_percent, 100.0);
    }

    #[test]
    fn zero_limit_rule() {
        assert_eq!(progress_percent(50, 0), 100.0);
        assert_eq!(progress_percent(0, 0), 0.0);
        assert_eq!(progress_percent(-20, 0), 0.0);
        assert_eq!(progress_percent(10, -5), 100.0);
    }
}
