use crate::amount::parse_amount;
use crate::errors::{AppError, LedgerError};
use crate::goal::GoalSettings;
use crate::models::{
    AddEntryRequest, AppData, CreateGoalRequest, Entry, Goal, GoalListItem, GoalResponse,
    GoalSummary, Preferences, SetProfitRequest, UpdateGoalRequest,
};
use crate::reminders::ReminderNotice;
use crate::state::AppState;
use crate::stats::build_summary;
use crate::transfer::{ExportDocument, apply_import, export_csv, export_document, import_document};
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse},
};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let active = data.active_goal.as_ref().and_then(|id| data.goals.get(id));
    Html(render_index(active, &data.preferences))
}

pub async fn list_goals(State(state): State<AppState>) -> Json<Vec<GoalListItem>> {
    let data = state.data.lock().await;
    let items = data
        .goals
        .values()
        .map(|goal| GoalListItem {
            id: goal.id.clone(),
            name: goal.name.clone(),
            active: data.active_goal.as_deref() == Some(goal.id.as_str()),
        })
        .collect();
    Json(items)
}

pub async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalResponse>), AppError> {
    let goal = Goal::create(GoalSettings::from_request(payload, today()))?;
    info!(goal_id = %goal.id, name = %goal.name, "goal created");

    let mut data = state.data.lock().await;
    let response = respond(&goal);
    if data.active_goal.is_none() {
        data.active_goal = Some(goal.id.clone());
    }
    data.goals.insert(goal.id.clone(), goal);
    state.save(&data).await;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(respond(find_goal(&data, &id)?)))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalSummary>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_summary(find_goal(&data, &id)?)))
}

pub async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateGoalRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    let mut data = state.data.lock().await;
    let goal = find_goal_mut(&mut data, &id)?;
    goal.apply_update(payload)?;
    let response = respond(goal);
    state.save(&data).await;
    Ok(Json(response))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    if data.goals.remove(&id).is_none() {
        return Err(goal_not_found(&id));
    }
    if data.active_goal.as_deref() == Some(id.as_str()) {
        data.active_goal = data.goals.keys().next().cloned();
    }
    info!(goal_id = %id, "goal deleted");
    state.save(&data).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn activate_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GoalListItem>, AppError> {
    let mut data = state.data.lock().await;
    let name = find_goal(&data, &id)?.name.clone();
    data.active_goal = Some(id.clone());
    state.save(&data).await;
    Ok(Json(GoalListItem { id, name, active: true }))
}

pub async fn set_week_profit(
    State(state): State<AppState>,
    Path((id, week)): Path<(String, u32)>,
    Json(payload): Json<SetProfitRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    let mut data = state.data.lock().await;
    let goal = find_goal_mut(&mut data, &id)?;
    let index = week_index(week, goal)?;
    goal.ledger.set_week_profit(index, &payload.profit)?;
    goal.touch();
    let response = respond(goal);
    state.save(&data).await;
    Ok(Json(response))
}

pub async fn add_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AddEntryRequest>,
) -> Result<Json<GoalResponse>, AppError> {
    let mut data = state.data.lock().await;
    let goal = find_goal_mut(&mut data, &id)?;
    let index = goal
        .ledger
        .week_for_date(payload.date)
        .ok_or(LedgerError::DateOutOfRange(payload.date))?;
    goal.ledger.add_entry(
        index,
        Entry {
            id: Uuid::new_v4().to_string(),
            date: payload.date,
            amount: parse_amount(&payload.amount),
            note: payload.note.trim().to_string(),
        },
    )?;
    goal.touch();
    let response = respond(goal);
    state.save(&data).await;
    Ok(Json(response))
}

pub async fn remove_entry(
    State(state): State<AppState>,
    Path((id, week, entry_id)): Path<(String, u32, String)>,
) -> Result<Json<GoalResponse>, AppError> {
    let mut data = state.data.lock().await;
    let goal = find_goal_mut(&mut data, &id)?;
    let index = week_index(week, goal)?;
    goal.ledger.remove_entry(index, &entry_id)?;
    goal.touch();
    let response = respond(goal);
    state.save(&data).await;
    Ok(Json(response))
}

pub async fn export_json(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let document: ExportDocument = export_document(find_goal(&data, &id)?);
    Ok((
        [(header::CONTENT_DISPOSITION, "attachment; filename=\"savings-goal.json\"")],
        Json(document),
    ))
}

pub async fn export_csv_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let body = export_csv(find_goal(&data, &id)?.ledger.weeks()).map_err(AppError::internal)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"savings-goal.csv\""),
        ],
        body,
    ))
}

pub async fn import_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<GoalResponse>, AppError> {
    let mut data = state.data.lock().await;
    let goal = find_goal_mut(&mut data, &id)?;
    let imported = import_document(&body, today()).inspect_err(|err| {
        warn!(goal_id = %id, "import rejected: {err}");
    })?;
    apply_import(goal, imported);
    info!(goal_id = %id, weeks = goal.total_weeks, "goal imported");
    let response = respond(goal);
    state.save(&data).await;
    Ok(Json(response))
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    let data = state.data.lock().await;
    Json(data.preferences.clone())
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Json(payload): Json<Preferences>,
) -> Result<Json<Preferences>, AppError> {
    if !is_hex_color(&payload.accent_color) {
        return Err(AppError::bad_request("accent colour must look like #rrggbb"));
    }
    let mut data = state.data.lock().await;
    data.preferences = payload.clone();
    state.save(&data).await;
    Ok(Json(payload))
}

pub async fn notifications(State(state): State<AppState>) -> Json<Vec<ReminderNotice>> {
    Json(state.drain_notices())
}

fn respond(goal: &Goal) -> GoalResponse {
    GoalResponse {
        goal: goal.clone(),
        summary: build_summary(goal),
    }
}

fn find_goal<'a>(data: &'a AppData, id: &str) -> Result<&'a Goal, AppError> {
    data.goals.get(id).ok_or_else(|| goal_not_found(id))
}

fn find_goal_mut<'a>(data: &'a mut AppData, id: &str) -> Result<&'a mut Goal, AppError> {
    data.goals.get_mut(id).ok_or_else(|| goal_not_found(id))
}

fn goal_not_found(id: &str) -> AppError {
    AppError::not_found(format!("goal {id} not found"))
}

/// Converts a 1-based week from the URL into a ledger index.
fn week_index(week: u32, goal: &Goal) -> Result<usize, AppError> {
    week.checked_sub(1)
        .map(|index| index as usize)
        .filter(|index| *index < goal.ledger.len())
        .ok_or_else(|| AppError::not_found(format!("week {week} not found")))
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
