//! Import and export of a single goal.
//!
//! The JSON document carries `goalName`, `target`, `startDate`, `totalWeeks`,
//! `visibleWeeks`, `weeks` and `lastModified`. Import is lenient: only a
//! missing or non-list `weeks` rejects the file, every other field falls back
//! to the goal defaults.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::amount::{format_amount, parse_amount};
use crate::errors::ImportError;
use crate::goal::{
    GoalSettings, MAX_NAME_LEN, MAX_TOTAL_WEEKS, is_supported_start_date, now_timestamp,
};
use crate::ledger::{Ledger, sum_amounts};
use crate::models::{Entry, Goal, WeekRecord};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub goal_name: String,
    pub target: Decimal,
    pub start_date: NaiveDate,
    pub total_weeks: u32,
    pub visible_weeks: u32,
    pub weeks: Vec<WeekRecord>,
    pub last_modified: String,
}

pub fn export_document(goal: &Goal) -> ExportDocument {
    ExportDocument {
        goal_name: goal.name.clone(),
        target: goal.target,
        start_date: goal.start_date,
        total_weeks: goal.total_weeks,
        visible_weeks: goal.visible_weeks,
        weeks: goal.ledger.weeks().to_vec(),
        last_modified: now_timestamp(),
    }
}

/// Writes `Week,Weekly Profit,Cumulative` followed by one row per week.
pub fn export_csv(weeks: &[WeekRecord]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(["Week", "Weekly Profit", "Cumulative"])?;
    for week in weeks {
        writer.write_record([
            week.week.to_string(),
            format_amount(week.profit),
            format_amount(week.cumulative),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// A parsed import, ready to replace a goal's settings and ledger.
#[derive(Debug, Clone)]
pub struct ImportedGoal {
    pub settings: GoalSettings,
    pub ledger: Ledger,
}

pub fn import_document(text: &str, today: NaiveDate) -> Result<ImportedGoal, ImportError> {
    let root: Value =
        serde_json::from_str(text).map_err(|err| ImportError::Malformed(err.to_string()))?;
    let Value::Object(fields) = root else {
        return Err(ImportError::Malformed("expected a JSON object".into()));
    };
    let Some(Value::Array(items)) = fields.get("weeks") else {
        return Err(ImportError::MissingWeeks);
    };

    let defaults = GoalSettings::defaults(today);
    let name = fields
        .get("goalName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.chars().take(MAX_NAME_LEN).collect())
        .unwrap_or(defaults.name);
    let target = amount_field(fields.get("target"))
        .filter(|target| *target > Decimal::ZERO)
        .unwrap_or(defaults.target);
    let start_date = fields
        .get("startDate")
        .and_then(Value::as_str)
        .and_then(parse_date)
        .filter(|date| is_supported_start_date(*date))
        .unwrap_or(defaults.start_date);
    let total_weeks = fields
        .get("totalWeeks")
        .and_then(Value::as_u64)
        .and_then(|weeks| u32::try_from(weeks).ok())
        .filter(|weeks| (1..=MAX_TOTAL_WEEKS).contains(weeks))
        .unwrap_or(defaults.total_weeks);
    let visible_weeks = fields
        .get("visibleWeeks")
        .and_then(Value::as_u64)
        .map(|weeks| weeks.clamp(1, u64::from(total_weeks)) as u32)
        .unwrap_or(total_weeks);

    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| week_record(index, item))
        .collect::<Result<Vec<_>, _>>()?;
    let mut ledger = Ledger::from_weeks(records).map_err(|_| ImportError::Overflow)?;
    ledger.resize(total_weeks, start_date);
    ledger.rebucket(start_date);

    Ok(ImportedGoal {
        settings: GoalSettings {
            name,
            target,
            start_date,
            total_weeks,
            visible_weeks,
        },
        ledger,
    })
}

/// Replaces a goal's settings and weeks with an import.
pub fn apply_import(goal: &mut Goal, imported: ImportedGoal) {
    goal.ledger = imported.ledger;
    goal.start_date = imported.settings.start_date;
    goal.total_weeks = imported.settings.total_weeks;
    goal.replace_settings(imported.settings);
    goal.touch();
}

fn week_record(index: usize, item: &Value) -> Result<WeekRecord, ImportError> {
    let week = index as u32 + 1;
    let mut record = WeekRecord::empty(week, Decimal::ZERO);
    let Value::Object(fields) = item else {
        return Ok(record);
    };

    record.entries = entries_field(fields);
    record.profit = if record.entries.is_empty() {
        amount_field(fields.get("profit")).unwrap_or(Decimal::ZERO)
    } else {
        sum_amounts(&record.entries).map_err(|_| ImportError::Overflow)?
    };
    record.is_filled = fields
        .get("isFilled")
        .and_then(Value::as_bool)
        .unwrap_or(!record.profit.is_zero());
    if let Some(name) = fields.get("displayName").and_then(Value::as_str) {
        record.display_name = Some(name.to_string());
    }
    Ok(record)
}

fn entries_field(fields: &Map<String, Value>) -> Vec<Entry> {
    let Some(Value::Array(items)) = fields.get("entries") else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let date = item.get("date").and_then(Value::as_str).and_then(parse_date)?;
            let amount = amount_field(item.get("amount"))?;
            Some(Entry {
                id: item
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                date,
                amount,
                note: item
                    .get("note")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

fn amount_field(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(number) => Some(parse_amount(&number.to_string())),
        Value::String(text) => Some(parse_amount(text)),
        _ => None,
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
