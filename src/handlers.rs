use crate::errors::AppError;
use crate::ledger::{LedgerChange, LedgerEvent};
use crate::models::{Entry, EntryKind, EntryRequest, FilterQuery, LimitRequest, RemoveResponse};
use crate::state::AppState;
use crate::stats::Stats;
use crate::ui::render_index;
use crate::validate;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::Local;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let ledger = state.ledger.lock().await;
    Html(render_index(&today_string(), &ledger.stats()))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<Stats> {
    let ledger = state.ledger.lock().await;
    Json(ledger.stats())
}

pub async fn list_meals(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<Vec<Entry>> {
    list_entries(&state, EntryKind::Meal, query).await
}

pub async fn list_workouts(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<Vec<Entry>> {
    list_entries(&state, EntryKind::Workout, query).await
}

pub async fn add_meal(
    State(state): State<AppState>,
    Json(payload): Json<EntryRequest>,
) -> Result<Json<LedgerChange>, AppError> {
    add_entry(&state, EntryKind::Meal, payload).await
}

pub async fn add_workout(
    State(state): State<AppState>,
    Json(payload): Json<EntryRequest>,
) -> Result<Json<LedgerChange>, AppError> {
    add_entry(&state, EntryKind::Workout, payload).await
}

pub async fn remove_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemoveResponse>, AppError> {
    remove_entry(&state, EntryKind::Meal, &id).await
}

pub async fn remove_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemoveResponse>, AppError> {
    remove_entry(&state, EntryKind::Workout, &id).await
}

pub async fn set_limit(
    State(state): State<AppState>,
    Json(payload): Json<LimitRequest>,
) -> Result<Json<LedgerChange>, AppError> {
    let limit = validate::calorie_limit(&payload.limit)?;
    let mut ledger = state.ledger.lock().await;
    Ok(Json(ledger.set_calorie_limit(limit)?))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<LedgerChange>, AppError> {
    let mut ledger = state.ledger.lock().await;
    Ok(Json(ledger.reset()?))
}

async fn list_entries(state: &AppState, kind: EntryKind, query: FilterQuery) -> Json<Vec<Entry>> {
    let ledger = state.ledger.lock().await;
    let filter = query.filter.unwrap_or_default();
    Json(ledger.filter_entries(kind, &filter))
}

async fn add_entry(
    state: &AppState,
    kind: EntryKind,
    payload: EntryRequest,
) -> Result<Json<LedgerChange>, AppError> {
    let name = validate::entry_name(&payload.name)?;
    let calories = validate::calorie_amount(&payload.calories)?;
    let entry = Entry::new(name, calories)?;

    let mut ledger = state.ledger.lock().await;
    Ok(Json(ledger.add_entry(kind, entry)?))
}

async fn remove_entry(
    state: &AppState,
    kind: EntryKind,
    id: &str,
) -> Result<Json<RemoveResponse>, AppError> {
    let mut ledger = state.ledger.lock().await;
    let removed = ledger.remove_entry(kind, id)?.and_then(|change| match change.event {
        LedgerEvent::MealRemoved(entry) | LedgerEvent::WorkoutRemoved(entry) => Some(entry),
        _ => None,
    });

    Ok(Json(RemoveResponse {
        removed,
        stats: ledger.stats(),
    }))
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
