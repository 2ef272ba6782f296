//! Completion date projection from the average profitable week.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::WeekRecord;

/// Projections further out than this are reported as this many weeks.
const MAX_PROJECTION_WEEKS: u32 = 52 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientReason {
    StartSaving,
    NegativeProfit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    fn from_sample_size(profitable_weeks: usize) -> Self {
        match profitable_weeks {
            0 | 1 => Self::Low,
            2 | 3 => Self::Medium,
            _ => Self::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Prediction {
    Insufficient {
        reason: InsufficientReason,
    },
    Projected {
        average_weekly_profit: Decimal,
        weeks_needed: u32,
        target_date: NaiveDate,
        confidence: Confidence,
    },
}

/// Projects when `target` is reached if profitable weeks keep their average.
pub fn predict_completion(weeks: &[WeekRecord], target: Decimal, as_of: NaiveDate) -> Prediction {
    let positive: Vec<Decimal> = weeks
        .iter()
        .filter(|week| week.is_profitable())
        .map(|week| week.profit)
        .collect();
    if positive.is_empty() {
        return Prediction::Insufficient {
            reason: InsufficientReason::StartSaving,
        };
    }

    let count = Decimal::from(positive.len());
    let total = positive
        .iter()
        .try_fold(Decimal::ZERO, |sum, profit| sum.checked_add(*profit));
    let average = match total {
        Some(total) => total / count,
        // summing per-week shares keeps every step in range
        None => positive
            .iter()
            .try_fold(Decimal::ZERO, |sum, profit| sum.checked_add(*profit / count))
            .unwrap_or(Decimal::MAX),
    };
    if average <= Decimal::ZERO {
        return Prediction::Insufficient {
            reason: InsufficientReason::NegativeProfit,
        };
    }

    let saved = weeks.last().map(|week| week.cumulative).unwrap_or(Decimal::ZERO);
    let remaining = target
        .checked_sub(saved)
        .unwrap_or(Decimal::MAX)
        .max(Decimal::ZERO);
    // remaining / (total / count), without rounding the average first
    let exact = total.and_then(|total| remaining.checked_mul(count)?.checked_div(total));
    let weeks_needed = exact
        .or_else(|| remaining.checked_div(average))
        .map(|value| value.ceil())
        .and_then(|value| value.to_u32())
        .unwrap_or(MAX_PROJECTION_WEEKS)
        .min(MAX_PROJECTION_WEEKS);
    let target_date = as_of
        .checked_add_signed(Duration::weeks(i64::from(weeks_needed)))
        .unwrap_or(NaiveDate::MAX);

    Prediction::Projected {
        average_weekly_profit: average.round_dp(2),
        weeks_needed,
        target_date,
        confidence: Confidence::from_sample_size(positive.len()),
    }
}
