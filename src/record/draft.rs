//! Raw record input from forms and JSON bodies, and its normalization into a [NewRecord].

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    record::{Amount, Category, NewRecord},
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// An amount as the client sent it.
///
/// HTML forms send text, JSON clients may send a number, a string or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON integer.
    Integer(i64),
    /// Any other JSON number. Only whole numbers within [Amount::MAX] are accepted.
    Float(f64),
    /// Text from a form field or a JSON string. Empty text means "no amount".
    Text(String),
}

impl AmountInput {
    fn normalize(self) -> Result<Option<Amount>, Error> {
        match self {
            AmountInput::Integer(value) => Amount::new(value).map(Some),
            AmountInput::Float(value)
                if value.is_finite()
                    && value.fract() == 0.0
                    && value.abs() <= Amount::MAX as f64 =>
            {
                Amount::new(value as i64).map(Some)
            }
            AmountInput::Float(value) => Err(Error::InvalidAmount(value.to_string())),
            AmountInput::Text(text) if text.trim().is_empty() => Ok(None),
            AmountInput::Text(text) => text.parse().map(Some),
        }
    }
}

/// The fields of a record as submitted for creation or update.
///
/// Every field is optional at this stage, [RecordDraft::validate] decides
/// which omissions are errors and which fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub in_amount: Option<AmountInput>,
    #[serde(default)]
    pub out_amount: Option<AmountInput>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl RecordDraft {
    /// Validate the draft and normalize it into a record ready for the database.
    ///
    /// - The category must not be empty.
    /// - An empty or missing date defaults to `today`, any other text must be
    ///   a date formatted as YYYY-MM-DD.
    /// - An empty, `null` or missing amount means the record has no such leg.
    ///   Other amounts must be whole, non-negative numbers.
    /// - Missing details and memo default to empty text.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyCategory], [Error::InvalidDate],
    /// [Error::InvalidAmount] or [Error::NegativeAmount] for the first field
    /// that fails, checked in that order.
    pub fn validate(self, today: Date) -> Result<NewRecord, Error> {
        let category = Category::new(self.category.as_deref().unwrap_or_default())?;
        let date = parse_date_or(self.date.as_deref(), today)?;
        let in_amount = normalize_amount(self.in_amount)?;
        let out_amount = normalize_amount(self.out_amount)?;

        Ok(NewRecord {
            date,
            category,
            details: self.details.unwrap_or_default(),
            in_amount,
            out_amount,
            memo: self.memo.unwrap_or_default(),
        })
    }
}

fn parse_date_or(text: Option<&str>, default: Date) -> Result<Date, Error> {
    match text.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => {
            Date::parse(text, DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
        }
    }
}

fn normalize_amount(input: Option<AmountInput>) -> Result<Option<Amount>, Error> {
    match input {
        Some(input) => input.normalize(),
        None => Ok(None),
    }
}
