use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::forecast::Prediction;
use crate::ledger::Ledger;
use crate::streaks::Streaks;

/// A single dated transaction recorded against a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

/// One week of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRecord {
    pub week: u32,
    pub profit: Decimal,
    pub cumulative: Decimal,
    #[serde(default)]
    pub is_filled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Entry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl WeekRecord {
    pub fn empty(week: u32, cumulative: Decimal) -> Self {
        Self {
            week,
            profit: Decimal::ZERO,
            cumulative,
            is_filled: false,
            start_date: None,
            end_date: None,
            entries: Vec::new(),
            display_name: Some(format!("Week {week}")),
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.profit > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    pub enabled: bool,
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            weekday: Weekday::Sun,
            hour: 18,
            minute: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target: Decimal,
    pub start_date: NaiveDate,
    pub total_weeks: u32,
    pub visible_weeks: u32,
    #[serde(rename = "weeks")]
    pub ledger: Ledger,
    #[serde(default)]
    pub reminder: ReminderSettings,
    pub last_modified: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "Preferences::default_accent_color")]
    pub accent_color: String,
    #[serde(default = "Preferences::default_show_cumulative")]
    pub show_cumulative: bool,
}

impl Preferences {
    pub fn default_accent_color() -> String {
        "#ff6b4a".into()
    }

    pub fn default_show_cumulative() -> bool {
        true
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            accent_color: Self::default_accent_color(),
            show_cumulative: Self::default_show_cumulative(),
        }
    }
}

/// Everything persisted to the state file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    #[serde(default)]
    pub goals: BTreeMap<String, Goal>,
    #[serde(default)]
    pub active_goal: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub name: Option<String>,
    pub target: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub total_weeks: Option<u32>,
    pub visible_weeks: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub name: Option<String>,
    pub target: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub total_weeks: Option<u32>,
    pub visible_weeks: Option<u32>,
    pub reminder: Option<ReminderSettings>,
}

#[derive(Debug, Deserialize)]
pub struct SetProfitRequest {
    pub profit: String,
}

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub date: NaiveDate,
    pub amount: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalListItem {
    pub id: String,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub week: u32,
    pub profit: Decimal,
    pub cumulative: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub target: Decimal,
    pub total_saved: Decimal,
    pub remaining: Decimal,
    pub progress_percent: Decimal,
    pub weeks_logged: u32,
    pub current_week: Option<u32>,
    pub best_week: Option<ChartPoint>,
    pub worst_week: Option<ChartPoint>,
    pub streaks: Streaks,
    pub prediction: Prediction,
    pub chart: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub goal: Goal,
    pub summary: GoalSummary,
}
