//! Weekly ledger engine.
//!
//! A ledger is the ordered list of weeks for one goal. Week `i` (0-based)
//! always carries `week == i + 1` and
//! `cumulative == cumulative[i - 1] + profit`, with `cumulative[0] == profit[0]`.
//! Every mutating method restores that invariant before returning.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::parse_amount;
use crate::errors::LedgerError;
use crate::models::{Entry, WeekRecord};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    weeks: Vec<WeekRecord>,
}

/// Calendar bounds of a 1-based week counted from `start_date`.
pub fn week_bounds(start_date: NaiveDate, week: u32) -> (NaiveDate, NaiveDate) {
    let start = start_date + Duration::weeks(i64::from(week.saturating_sub(1)));
    (start, start + Duration::days(6))
}

impl Ledger {
    /// Builds `total_weeks` unfilled weeks starting on `start_date`.
    pub fn new(total_weeks: u32, start_date: NaiveDate) -> Self {
        let mut ledger = Self::default();
        ledger.resize(total_weeks, start_date);
        ledger
    }

    /// Wraps weeks read from an external source, renumbering them by
    /// position and recomputing every cumulative total.
    pub fn from_weeks(weeks: Vec<WeekRecord>) -> Result<Self, LedgerError> {
        let mut ledger = Self { weeks };
        ledger.recalculate()?;
        Ok(ledger)
    }

    pub fn weeks(&self) -> &[WeekRecord] {
        &self.weeks
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WeekRecord> {
        self.weeks.get(index)
    }

    pub fn last_cumulative(&self) -> Decimal {
        self.weeks
            .last()
            .map(|week| week.cumulative)
            .unwrap_or(Decimal::ZERO)
    }

    /// Sets a week's profit from free text. Unparseable text counts as zero.
    pub fn set_week_profit(
        &mut self,
        index: usize,
        text: &str,
    ) -> Result<&WeekRecord, LedgerError> {
        self.set_week_amount(index, parse_amount(text))
    }

    /// Sets a week's profit directly, replacing any itemised entries.
    ///
    /// Fails with [`LedgerError::Overflow`] when a running total would leave
    /// the representable range; the ledger is then left unchanged.
    pub fn set_week_amount(
        &mut self,
        index: usize,
        amount: Decimal,
    ) -> Result<&WeekRecord, LedgerError> {
        self.check_index(index)?;
        let totals = self.running_totals(index, amount)?;
        let record = &mut self.weeks[index];
        record.profit = amount;
        record.is_filled = true;
        record.entries.clear();
        self.commit_totals(index, totals);
        Ok(&self.weeks[index])
    }

    /// Records a dated entry; the week's profit becomes the sum of its entries.
    pub fn add_entry(&mut self, index: usize, entry: Entry) -> Result<&WeekRecord, LedgerError> {
        self.check_index(index)?;
        let mut entries = self.weeks[index].entries.clone();
        entries.push(entry);
        entries.sort_by_key(|entry| entry.date);
        let profit = sum_amounts(&entries)?;
        let totals = self.running_totals(index, profit)?;

        let record = &mut self.weeks[index];
        record.entries = entries;
        record.profit = profit;
        record.is_filled = true;
        self.commit_totals(index, totals);
        Ok(&self.weeks[index])
    }

    pub fn remove_entry(&mut self, index: usize, entry_id: &str) -> Result<Entry, LedgerError> {
        self.check_index(index)?;
        let position = self.weeks[index]
            .entries
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or_else(|| LedgerError::EntryNotFound(entry_id.to_string()))?;
        let mut entries = self.weeks[index].entries.clone();
        let removed = entries.remove(position);
        let profit = sum_amounts(&entries)?;
        let totals = self.running_totals(index, profit)?;

        let record = &mut self.weeks[index];
        record.entries = entries;
        record.profit = profit;
        self.commit_totals(index, totals);
        Ok(removed)
    }

    /// Grows or shrinks the ledger to `new_total` weeks.
    ///
    /// New weeks are unfilled, carry the last cumulative forward and get
    /// calendar bounds from `start_date`. Shrinking drops trailing weeks.
    pub fn resize(&mut self, new_total: u32, start_date: NaiveDate) {
        let new_len = new_total as usize;
        if new_len <= self.weeks.len() {
            self.weeks.truncate(new_len);
            return;
        }

        let carried = self.last_cumulative();
        for week in (self.weeks.len() as u32 + 1)..=new_total {
            let (start, end) = week_bounds(start_date, week);
            let mut record = WeekRecord::empty(week, carried);
            record.start_date = Some(start);
            record.end_date = Some(end);
            self.weeks.push(record);
        }
    }

    /// Moves every week's calendar bounds to follow a new start date.
    pub fn rebucket(&mut self, start_date: NaiveDate) {
        for record in &mut self.weeks {
            let (start, end) = week_bounds(start_date, record.week);
            record.start_date = Some(start);
            record.end_date = Some(end);
        }
    }

    /// Index of the week whose calendar bounds contain `date`.
    pub fn week_for_date(&self, date: NaiveDate) -> Option<usize> {
        self.weeks.iter().position(|record| match (record.start_date, record.end_date) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        })
    }

    /// 1-based week containing `today`, clamped to the last week.
    pub fn current_week(&self, today: NaiveDate) -> Option<u32> {
        let start = self.weeks.first()?.start_date?;
        if today < start {
            return None;
        }
        let elapsed = (today - start).num_days() / 7 + 1;
        let clamped = elapsed.min(self.weeks.len() as i64);
        u32::try_from(clamped).ok()
    }

    /// Renumbers weeks by position and recomputes all cumulative totals.
    /// On overflow the ledger is left unchanged.
    pub fn recalculate(&mut self) -> Result<(), LedgerError> {
        let Some(first) = self.weeks.first() else {
            return Ok(());
        };
        let totals = self.running_totals(0, first.profit)?;
        for (index, record) in self.weeks.iter_mut().enumerate() {
            record.week = index as u32 + 1;
        }
        self.commit_totals(0, totals);
        Ok(())
    }

    /// Cumulative totals for weeks `index..`, as if week `index` had `profit`.
    fn running_totals(&self, index: usize, profit: Decimal) -> Result<Vec<Decimal>, LedgerError> {
        let mut running = match index {
            0 => Decimal::ZERO,
            _ => self.weeks[index - 1].cumulative,
        };
        let mut totals = Vec::with_capacity(self.weeks.len() - index);
        for (offset, record) in self.weeks[index..].iter().enumerate() {
            let amount = if offset == 0 { profit } else { record.profit };
            running = running.checked_add(amount).ok_or(LedgerError::Overflow)?;
            totals.push(running);
        }
        Ok(totals)
    }

    fn commit_totals(&mut self, index: usize, totals: Vec<Decimal>) {
        for (record, total) in self.weeks[index..].iter_mut().zip(totals) {
            record.cumulative = total;
        }
    }

    fn check_index(&self, index: usize) -> Result<(), LedgerError> {
        let len = self.weeks.len();
        if index < len {
            Ok(())
        } else {
            Err(LedgerError::WeekOutOfRange { index, len })
        }
    }
}

/// Sum of entry amounts, failing instead of overflowing.
pub fn sum_amounts(entries: &[Entry]) -> Result<Decimal, LedgerError> {
    entries
        .iter()
        .try_fold(Decimal::ZERO, |sum, entry| sum.checked_add(entry.amount))
        .ok_or(LedgerError::Overflow)
}
