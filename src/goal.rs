use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::amount::parse_amount;
use crate::errors::GoalError;
use crate::ledger::Ledger;
use crate::models::{CreateGoalRequest, Goal, ReminderSettings, UpdateGoalRequest};

pub const DEFAULT_GOAL_NAME: &str = "Porsche GT3";
pub const DEFAULT_TARGET: Decimal = Decimal::from_parts(280_000, 0, 0, false, 0);
pub const DEFAULT_TOTAL_WEEKS: u32 = 49;
pub const MAX_TOTAL_WEEKS: u32 = 520;
pub const MAX_NAME_LEN: usize = 100;
const MIN_START_YEAR: i32 = 1900;
const MAX_START_YEAR: i32 = 9999;

/// Settings a goal is built from, already parsed but not yet validated.
#[derive(Debug, Clone)]
pub struct GoalSettings {
    pub name: String,
    pub target: Decimal,
    pub start_date: NaiveDate,
    pub total_weeks: u32,
    pub visible_weeks: u32,
}

impl GoalSettings {
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            name: DEFAULT_GOAL_NAME.to_string(),
            target: DEFAULT_TARGET,
            start_date: today,
            total_weeks: DEFAULT_TOTAL_WEEKS,
            visible_weeks: DEFAULT_TOTAL_WEEKS,
        }
    }

    pub fn from_request(request: CreateGoalRequest, today: NaiveDate) -> Self {
        let defaults = Self::defaults(today);
        let total_weeks = request.total_weeks.unwrap_or(defaults.total_weeks);
        Self {
            name: request.name.unwrap_or(defaults.name),
            target: request.target.as_deref().map(parse_amount).unwrap_or(defaults.target),
            start_date: request.start_date.unwrap_or(defaults.start_date),
            total_weeks,
            visible_weeks: request.visible_weeks.unwrap_or(total_weeks),
        }
    }

    pub fn validate(&self) -> Result<(), GoalError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(GoalError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(GoalError::NameTooLong { max: MAX_NAME_LEN });
        }
        if self.target <= Decimal::ZERO {
            return Err(GoalError::NonPositiveTarget);
        }
        if !(1..=MAX_TOTAL_WEEKS).contains(&self.total_weeks) {
            return Err(GoalError::TotalWeeksOutOfRange { max: MAX_TOTAL_WEEKS });
        }
        if !(1..=self.total_weeks).contains(&self.visible_weeks) {
            return Err(GoalError::VisibleWeeksOutOfRange);
        }
        if !is_supported_start_date(self.start_date) {
            return Err(GoalError::StartDateOutOfRange {
                min: MIN_START_YEAR,
                max: MAX_START_YEAR,
            });
        }
        Ok(())
    }
}

pub fn is_supported_start_date(date: NaiveDate) -> bool {
    (MIN_START_YEAR..=MAX_START_YEAR).contains(&date.year())
}

fn validate_reminder(reminder: &ReminderSettings) -> Result<(), GoalError> {
    if reminder.hour > 23 || reminder.minute > 59 {
        return Err(GoalError::InvalidReminderTime {
            hour: reminder.hour,
            minute: reminder.minute,
        });
    }
    Ok(())
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}

impl Goal {
    /// Creates a goal with an all-zero ledger.
    pub fn create(settings: GoalSettings) -> Result<Self, GoalError> {
        settings.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: settings.name.trim().to_string(),
            target: settings.target,
            start_date: settings.start_date,
            total_weeks: settings.total_weeks,
            visible_weeks: settings.visible_weeks,
            ledger: Ledger::new(settings.total_weeks, settings.start_date),
            reminder: ReminderSettings::default(),
            last_modified: now_timestamp(),
        })
    }

    pub fn settings(&self) -> GoalSettings {
        GoalSettings {
            name: self.name.clone(),
            target: self.target,
            start_date: self.start_date,
            total_weeks: self.total_weeks,
            visible_weeks: self.visible_weeks,
        }
    }

    /// Applies a partial settings update. Nothing changes if validation fails.
    ///
    /// Changing the total resizes the ledger and clamps the visible window;
    /// changing the start date re-buckets week dates but keeps profits.
    pub fn apply_update(&mut self, update: UpdateGoalRequest) -> Result<(), GoalError> {
        let mut next = self.settings();
        if let Some(name) = update.name {
            next.name = name;
        }
        if let Some(target) = update.target.as_deref() {
            next.target = parse_amount(target);
        }
        if let Some(start_date) = update.start_date {
            next.start_date = start_date;
        }
        if let Some(total_weeks) = update.total_weeks {
            next.total_weeks = total_weeks;
            next.visible_weeks = next.visible_weeks.min(total_weeks);
        }
        if let Some(visible_weeks) = update.visible_weeks {
            next.visible_weeks = visible_weeks;
        }
        next.validate()?;
        if let Some(reminder) = &update.reminder {
            validate_reminder(reminder)?;
        }

        self.replace_settings(next);
        if let Some(reminder) = update.reminder {
            self.reminder = reminder;
        }
        self.touch();
        Ok(())
    }

    /// Installs validated settings, keeping the ledger consistent with them.
    pub fn replace_settings(&mut self, settings: GoalSettings) {
        if settings.start_date != self.start_date {
            self.ledger.rebucket(settings.start_date);
        }
        if settings.total_weeks != self.total_weeks
            || self.ledger.len() != settings.total_weeks as usize
        {
            self.ledger.resize(settings.total_weeks, settings.start_date);
        }
        self.name = settings.name.trim().to_string();
        self.target = settings.target;
        self.start_date = settings.start_date;
        self.total_weeks = settings.total_weeks;
        self.visible_weeks = settings.visible_weeks.clamp(1, settings.total_weeks.max(1));
    }

    pub fn touch(&mut self) {
        self.last_modified = now_timestamp();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
    }

    fn goal() -> Goal {
        Goal::create(GoalSettings {
            total_weeks: 10,
            visible_weeks: 8,
            ..GoalSettings::defaults(today())
        })
        .unwrap()
    }

    #[test]
    fn defaults_are_documented_values() {
        let settings = GoalSettings::defaults(today());
        assert_eq!(settings.name, "Porsche GT3");
        assert_eq!(settings.target, dec!(280000));
        assert_eq!(settings.total_weeks, 49);
        assert_eq!(settings.visible_weeks, 49);
    }

    #[test]
    fn create_builds_matching_ledger() {
        let goal = goal();
        assert_eq!(goal.ledger.len(), 10);
        assert_eq!(goal.total_weeks, 10);
        assert!(goal.ledger.weeks().iter().all(|week| week.profit.is_zero()));
        assert!(!goal.id.is_empty());
    }

    #[test]
    fn create_rejects_invalid_settings() {
        let blank = GoalSettings {
            name: "   ".into(),
            ..GoalSettings::defaults(today())
        };
        assert_eq!(Goal::create(blank).unwrap_err(), GoalError::EmptyName);

        let zero_target = GoalSettings {
            target: Decimal::ZERO,
            ..GoalSettings::defaults(today())
        };
        assert_eq!(Goal::create(zero_target).unwrap_err(), GoalError::NonPositiveTarget);

        let too_long = GoalSettings {
            total_weeks: MAX_TOTAL_WEEKS + 1,
            visible_weeks: 1,
            ..GoalSettings::defaults(today())
        };
        assert!(matches!(
            Goal::create(too_long).unwrap_err(),
            GoalError::TotalWeeksOutOfRange { .. }
        ));

        let wide_window = GoalSettings {
            visible_weeks: 50,
            ..GoalSettings::defaults(today())
        };
        assert_eq!(Goal::create(wide_window).unwrap_err(), GoalError::VisibleWeeksOutOfRange);
    }

    #[test]
    fn shrinking_total_clamps_visible_weeks() {
        let mut goal = goal();
        goal.ledger.set_week_profit(1, "25").unwrap();
        goal.apply_update(UpdateGoalRequest {
            total_weeks: Some(3),
            ..UpdateGoalRequest::default()
        })
        .unwrap();
        assert_eq!(goal.total_weeks, 3);
        assert_eq!(goal.visible_weeks, 3);
        assert_eq!(goal.ledger.len(), 3);
        assert_eq!(goal.ledger.last_cumulative(), dec!(25));
    }

    #[test]
    fn failed_update_changes_nothing() {
        let mut goal = goal();
        let before = serde_json::to_value(&goal).unwrap();
        let err = goal
            .apply_update(UpdateGoalRequest {
                name: Some("New".into()),
                target: Some("-5".into()),
                ..UpdateGoalRequest::default()
            })
            .unwrap_err();
        assert_eq!(err, GoalError::NonPositiveTarget);
        assert_eq!(serde_json::to_value(&goal).unwrap(), before);
    }

    #[test]
    fn invalid_reminder_time_is_rejected() {
        let mut goal = goal();
        let err = goal
            .apply_update(UpdateGoalRequest {
                reminder: Some(ReminderSettings {
                    enabled: true,
                    hour: 24,
                    ..ReminderSettings::default()
                }),
                ..UpdateGoalRequest::default()
            })
            .unwrap_err();
        assert_eq!(err, GoalError::InvalidReminderTime { hour: 24, minute: 0 });
        assert!(!goal.reminder.enabled);
    }

    #[test]
    fn moving_start_date_rebuckets_weeks() {
        let mut goal = goal();
        goal.ledger.set_week_profit(0, "10").unwrap();
        let later = today() + chrono::Duration::days(14);
        goal.apply_update(UpdateGoalRequest {
            start_date: Some(later),
            ..UpdateGoalRequest::default()
        })
        .unwrap();
        let first = goal.ledger.get(0).unwrap();
        assert_eq!(first.start_date, Some(later));
        assert_eq!(first.profit, dec!(10));
    }
}
