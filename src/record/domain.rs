//! Core record domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// Database identifier for a record.
pub type RecordId = i64;

/// A validated, non-empty category label, e.g. "食費" or "Salary".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategory] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategory)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::new(s)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative, whole amount of money in yen, at most [Amount::MAX].
///
/// Whether the money came in or went out is given by the leg of the record
/// that holds the amount, never by the sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// The largest amount a single leg may hold: one trillion yen.
    ///
    /// Every amount up to this bound is exactly representable as an `f64`,
    /// which the currency formatter relies on.
    pub const MAX: i64 = 1_000_000_000_000;

    /// Create an amount.
    ///
    /// # Errors
    ///
    /// This function will return an:
    /// - [Error::NegativeAmount] if `value` is less than zero,
    /// - or [Error::AmountTooLarge] if `value` is greater than [Amount::MAX].
    pub fn new(value: i64) -> Result<Self, Error> {
        if value < 0 {
            Err(Error::NegativeAmount(value))
        } else if value > Self::MAX {
            Err(Error::AmountTooLarge(value))
        } else {
            Ok(Self(value))
        }
    }

    /// The amount as a whole number of yen.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    /// Parse a whole number of yen, e.g. "4500".
    ///
    /// Thousands separators are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let value: i64 = text
            .parse()
            .map_err(|_| Error::InvalidAmount(text.to_owned()))?;

        Amount::new(value)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;

        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

/// One ledger entry: something bought, earned or both on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The ID of the record, assigned by the database.
    pub id: RecordId,
    /// The day the money moved.
    pub date: Date,
    /// What kind of income or spending this was.
    pub category: Category,
    /// A short description.
    pub details: String,
    /// The money that came in, if any.
    pub in_amount: Option<Amount>,
    /// The money that went out, if any.
    pub out_amount: Option<Amount>,
    /// A free-form note.
    pub memo: String,
}

/// A validated record that has not been saved yet.
///
/// Create one from user input with [crate::record::RecordDraft::validate].
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// The date the money moved.
    pub date: Date,
    /// The record's category.
    pub category: Category,
    /// A short description, may be empty.
    pub details: String,
    /// Money received, if any.
    pub in_amount: Option<Amount>,
    /// Money spent, if any.
    pub out_amount: Option<Amount>,
    /// Free-form notes, may be empty.
    pub memo: String,
}

impl NewRecord {
    /// Start a record for `date` and `category` with empty text fields and no legs.
    pub fn build(date: Date, category: Category) -> Self {
        Self {
            date,
            category,
            details: String::new(),
            in_amount: None,
            out_amount: None,
            memo: String::new(),
        }
    }

    /// Set the description.
    pub fn details(mut self, details: &str) -> Self {
        self.details = details.to_owned();
        self
    }

    /// Set the income leg.
    pub fn in_amount(mut self, amount: Option<Amount>) -> Self {
        self.in_amount = amount;
        self
    }

    /// Set the expense leg.
    pub fn out_amount(mut self, amount: Option<Amount>) -> Self {
        self.out_amount = amount;
        self
    }

    /// Set the note.
    pub fn memo(mut self, memo: &str) -> Self {
        self.memo = memo.to_owned();
        self
    }
}
