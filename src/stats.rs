use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::forecast::predict_completion;
use crate::models::{ChartPoint, Goal, GoalSummary, WeekRecord};
use crate::streaks::compute_streaks;

pub fn build_summary(goal: &Goal) -> GoalSummary {
    build_summary_at(Local::now().date_naive(), goal)
}

pub fn build_summary_at(today: NaiveDate, goal: &Goal) -> GoalSummary {
    let weeks = goal.ledger.weeks();
    let total_saved = goal.ledger.last_cumulative();
    // target is positive, so only a very negative total can overflow here
    let remaining = goal
        .target
        .checked_sub(total_saved)
        .unwrap_or(Decimal::MAX)
        .max(Decimal::ZERO);
    let progress_percent = progress_percent(total_saved, goal.target);

    let filled: Vec<&WeekRecord> = weeks.iter().filter(|week| week.is_filled).collect();
    // ties go to the earliest week
    let best_week = filled
        .iter()
        .rev()
        .max_by_key(|week| week.profit)
        .map(|week| point(week));
    let worst_week = filled.iter().min_by_key(|week| week.profit).map(|week| point(week));

    let chart = weeks
        .iter()
        .take(goal.visible_weeks as usize)
        .map(point)
        .collect();

    GoalSummary {
        target: goal.target,
        total_saved,
        remaining,
        progress_percent,
        weeks_logged: filled.len() as u32,
        current_week: goal.ledger.current_week(today),
        best_week,
        worst_week,
        streaks: compute_streaks(weeks),
        prediction: predict_completion(weeks, goal.target, today),
        chart,
    }
}

/// Share of `target` saved, between 0 and 100.
fn progress_percent(saved: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO || saved <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if saved >= target {
        return Decimal::ONE_HUNDRED;
    }
    saved
        .checked_div(target)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.min(Decimal::ONE_HUNDRED).round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

fn point(week: &WeekRecord) -> ChartPoint {
    ChartPoint {
        week: week.week,
        profit: week.profit,
        cumulative: week.cumulative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::Prediction;
    use crate::goal::GoalSettings;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn goal() -> Goal {
        Goal::create(GoalSettings {
            target: dec!(1000),
            total_weeks: 6,
            visible_weeks: 4,
            ..GoalSettings::defaults(today())
        })
        .unwrap()
    }

    #[test]
    fn summary_of_empty_goal() {
        let summary = build_summary_at(today(), &goal());
        assert_eq!(summary.total_saved, Decimal::ZERO);
        assert_eq!(summary.remaining, dec!(1000));
        assert_eq!(summary.progress_percent, Decimal::ZERO);
        assert_eq!(summary.weeks_logged, 0);
        assert_eq!(summary.current_week, Some(1));
        assert!(summary.best_week.is_none());
        assert!(matches!(summary.prediction, Prediction::Insufficient { .. }));
        assert_eq!(summary.chart.len(), 4);
    }

    #[test]
    fn summary_tracks_progress_and_extremes() {
        let mut goal = goal();
        goal.ledger.set_week_profit(0, "300").unwrap();
        goal.ledger.set_week_profit(1, "-50").unwrap();
        goal.ledger.set_week_profit(2, "0").unwrap();
        goal.ledger.set_week_profit(3, "200").unwrap();

        let summary = build_summary_at(today() + chrono::Duration::days(22), &goal);
        assert_eq!(summary.total_saved, dec!(450));
        assert_eq!(summary.remaining, dec!(550));
        assert_eq!(summary.progress_percent, dec!(45));
        assert_eq!(summary.weeks_logged, 4);
        assert_eq!(summary.current_week, Some(4));
        assert_eq!(summary.best_week.as_ref().map(|week| week.week), Some(1));
        assert_eq!(summary.worst_week.as_ref().map(|week| week.week), Some(2));
        assert_eq!(summary.streaks.current_streak, 1);
        assert_eq!(summary.streaks.best_streak, 1);
    }

    #[test]
    fn progress_is_capped_at_one_hundred() {
        let mut goal = goal();
        goal.ledger.set_week_profit(0, "2500").unwrap();
        let summary = build_summary_at(today(), &goal);
        assert_eq!(summary.progress_percent, dec!(100));
        assert_eq!(summary.remaining, Decimal::ZERO);
    }

    #[test]
    fn extreme_amounts_do_not_break_the_summary() {
        let mut goal = Goal::create(GoalSettings {
            target: dec!(0.0000001),
            total_weeks: 3,
            visible_weeks: 3,
            ..GoalSettings::defaults(today())
        })
        .unwrap();
        goal.ledger.set_week_profit(0, "1e24").unwrap();
        let summary = build_summary_at(today(), &goal);
        assert_eq!(summary.progress_percent, dec!(100));
        assert_eq!(summary.remaining, Decimal::ZERO);
        assert!(matches!(summary.prediction, Prediction::Projected { weeks_needed: 0, .. }));

        goal.ledger.set_week_amount(0, Decimal::MIN).unwrap();
        let summary = build_summary_at(today(), &goal);
        assert_eq!(summary.progress_percent, Decimal::ZERO);
        assert_eq!(summary.remaining, Decimal::MAX);
    }
}
