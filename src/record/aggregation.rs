//! Month bucketing and totals for ledger records.
//!
//! Everything here is a pure function of the records passed in, so the views
//! can recompute after every fetch.

use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use time::{Date, Month};

use crate::{
    Error,
    record::{Amount, Record},
};

/// A calendar month, formatted as `YYYY-MM`.
///
/// Month keys order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u8,
}

impl MonthKey {
    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
        }
    }

    /// A human readable label, e.g. "October 2025".
    pub fn label(&self) -> String {
        match Month::try_from(self.month) {
            Ok(month) => format!("{month} {}", self.year),
            Err(_) => self.to_string(),
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }
}

/// The distinct months that `records` fall in, earliest first.
pub fn months_present(records: &[Record]) -> Vec<MonthKey> {
    let mut months: Vec<MonthKey> = records
        .iter()
        .map(|record| MonthKey::of(record.date))
        .collect();

    months.sort();
    months.dedup();
    months
}

/// The records dated within `month`, in their original order.
pub fn select_month(records: &[Record], month: MonthKey) -> Vec<&Record> {
    records
        .iter()
        .filter(|record| MonthKey::of(record.date) == month)
        .collect()
}

/// The income, expense and net totals of a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// The sum of the income legs.
    pub income: i64,
    /// The sum of the expense legs.
    pub expense: i64,
    /// Income minus expense.
    pub net: i64,
}

/// Sum the income and expense legs of `records`.
///
/// Missing legs count as zero and an empty set of records has all-zero totals.
///
/// Legs are bounded by [Amount::MAX], so the sums are exact for any month with
/// fewer than nine million records. Beyond that they saturate instead of wrapping.
pub fn totals<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a Record>,
{
    let (income, expense) = records
        .into_iter()
        .fold((0i64, 0i64), |(income, expense), record| {
            (
                income.saturating_add(record.in_amount.map(Amount::get).unwrap_or(0)),
                expense.saturating_add(record.out_amount.map(Amount::get).unwrap_or(0)),
            )
        });

    Totals {
        income,
        expense,
        net: income.saturating_sub(expense),
    }
}

/// Moves between the months that have records.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthNavigation {
    months: Vec<MonthKey>,
    position: usize,
}

impl MonthNavigation {
    /// Create navigation over `months` positioned at `current`.
    ///
    /// `months` must be sorted, as returned by [months_present]. If `current`
    /// is `None` or not one of `months`, the latest month is used.
    /// Returns `None` if there are no months to navigate.
    pub fn new(months: Vec<MonthKey>, current: Option<MonthKey>) -> Option<Self> {
        let latest = months.len().checked_sub(1)?;
        let position = current
            .and_then(|current| months.binary_search(&current).ok())
            .unwrap_or(latest);

        Some(Self { months, position })
    }

    /// The month currently selected.
    pub fn current(&self) -> MonthKey {
        self.months[self.position]
    }

    /// The month before the current one, or the current month if it is the earliest.
    pub fn earlier(&self) -> MonthKey {
        self.months[self.position.saturating_sub(1)]
    }

    /// The month after the current one, or the current month if it is the latest.
    pub fn later(&self) -> MonthKey {
        self.months[(self.position + 1).min(self.months.len() - 1)]
    }

    /// Whether there is a month before the current one.
    pub fn has_earlier(&self) -> bool {
        self.position > 0
    }

    /// Whether there is a month after the current one.
    pub fn has_later(&self) -> bool {
        self.position + 1 < self.months.len()
    }
}

/// The totals for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    /// The month summarised.
    pub month: MonthKey,
    /// The totals of the month's records.
    pub totals: Totals,
    /// How many records fall in the month.
    pub record_count: usize,
}

/// Summarise every month that has records, earliest first.
pub fn monthly_summaries(records: &[Record]) -> Vec<MonthSummary> {
    let mut by_month: BTreeMap<MonthKey, Vec<&Record>> = BTreeMap::new();

    for record in records {
        by_month
            .entry(MonthKey::of(record.date))
            .or_default()
            .push(record);
    }

    by_month
        .into_iter()
        .map(|(month, records)| MonthSummary {
            month,
            record_count: records.len(),
            totals: totals(records),
        })
        .collect()
}


#[cfg(test)]
mod month_key_tests {
    use time::macros::date;

    use crate::Error;

    use super::MonthKey;

    #[test]
    fn formats_as_year_and_month() {
        assert_eq!(MonthKey::of(date!(2025 - 03 - 31)).to_string(), "2025-03");
    }

    #[test]
    fn parses_what_it_formats() {
        let key = MonthKey::of(date!(2025 - 10 - 02));

        assert_eq!("2025-10".parse(), Ok(key));
    }

    #[test]
    fn rejects_malformed_keys() {
        for text in ["2025", "2025-13", "2025-00", "25-10", "2025-1", "abcd-ef", ""] {
            assert_eq!(
                text.parse::<MonthKey>(),
                Err(Error::InvalidMonth(text.to_owned())),
                "{text}"
            );
        }
    }

    #[test]
    fn orders_chronologically() {
        let december = MonthKey::of(date!(2024 - 12 - 31));
        let january = MonthKey::of(date!(2025 - 01 - 01));

        assert!(december < january);
    }

    #[test]
    fn label_names_the_month() {
        assert_eq!(MonthKey::of(date!(2025 - 10 - 02)).label(), "October 2025");
    }
}
