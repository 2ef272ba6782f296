use serde::Serialize;

use crate::models::WeekRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Counts runs of consecutive profitable weeks.
///
/// The best streak is the longest run anywhere in the ledger. The current
/// streak is counted backwards from the last week: non-profitable weeks at
/// the tail are skipped until the first profitable week is seen, after which
/// the next non-profitable week ends the count.
pub fn compute_streaks(weeks: &[WeekRecord]) -> Streaks {
    let mut best_streak = 0;
    let mut run = 0;
    for week in weeks {
        if week.is_profitable() {
            run += 1;
            best_streak = best_streak.max(run);
        } else {
            run = 0;
        }
    }

    let mut current_streak = 0;
    let mut found_profit = false;
    for week in weeks.iter().rev() {
        if week.is_profitable() {
            found_profit = true;
            current_streak += 1;
        } else if found_profit {
            break;
        }
    }

    Streaks {
        current_streak,
        best_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn weeks(profits: &[i64]) -> Vec<WeekRecord> {
        let mut cumulative = Decimal::ZERO;
        profits
            .iter()
            .enumerate()
            .map(|(index, profit)| {
                let profit = Decimal::from(*profit);
                cumulative += profit;
                let mut record = WeekRecord::empty(index as u32 + 1, cumulative);
                record.profit = profit;
                record
            })
            .collect()
    }

    #[test]
    fn all_zero_ledger_has_no_streaks() {
        assert_eq!(compute_streaks(&weeks(&[0, 0, 0])), Streaks::default());
        assert_eq!(compute_streaks(&[]), Streaks::default());
    }

    #[test]
    fn trailing_unfilled_weeks_are_skipped() {
        let streaks = compute_streaks(&weeks(&[5, 3, 0, 0]));
        assert_eq!(streaks.current_streak, 2);
        assert_eq!(streaks.best_streak, 2);
    }

    #[test]
    fn interior_zero_breaks_current_streak() {
        let streaks = compute_streaks(&weeks(&[5, 0, 3]));
        assert_eq!(streaks.current_streak, 1);
        assert_eq!(streaks.best_streak, 1);
    }

    #[test]
    fn losses_break_runs() {
        let streaks = compute_streaks(&weeks(&[1, 2, 3, -4, 5, 6, 0]));
        assert_eq!(streaks.best_streak, 3);
        assert_eq!(streaks.current_streak, 2);
    }
}
