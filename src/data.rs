use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Amounts are rounded to this many places when written, never while computing.
pub const DISPLAY_DIGITS: u32 = 2;

/// Marker stored in place of a value that hasn't been set yet. It must not be
/// confused with zero, hence a non-numeric token.
pub const PLACEHOLDER: &str = "-";

/// One qualifying day of the schedule. `day` is 1-based among the emitted days,
/// and `day + remaining_days` always equals the total of qualifying days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScheduleDay {
    pub date: NaiveDate,
    pub day: u32,
    pub remaining_days: u32,
}

/// A row of the report as it is stored on disk. The projection part is filled by
/// generation, the three trailing fields stay unset until a balance is recorded
/// for that date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ReportRow {
    pub date: NaiveDate,
    pub day: u32,
    pub remaining_days: u32,
    pub increment_percent: Decimal,
    #[serde(with = "amount::optional")]
    pub increment_value: Option<Decimal>,
    #[serde(with = "amount")]
    pub projected_balance: Decimal,
    #[serde(with = "amount::optional")]
    pub actual_balance: Option<Decimal>,
    #[serde(with = "amount::optional")]
    pub difference: Option<Decimal>,
    #[serde(with = "percent")]
    pub difference_percent: Option<Decimal>,
}

/// What the user observed on a given date, compared with the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActualRecord {
    pub actual_balance: Decimal,
    pub difference: Decimal,
    /// `None` when the projected balance is zero.
    pub difference_percent: Option<Decimal>,
}

impl ReportRow {
    pub fn actual(&self) -> Option<ActualRecord> {
        Some(ActualRecord {
            actual_balance: self.actual_balance?,
            difference: self.difference?,
            difference_percent: self.difference_percent,
        })
    }

    /// Stores `actual` and recomputes both differences against the projected balance.
    /// Recording twice for the same row just replaces the previous record.
    pub fn record_actual(&mut self, actual: Decimal) -> ActualRecord {
        let difference = actual - self.projected_balance;
        let difference_percent = difference
            .checked_div(self.projected_balance)
            .map(|ratio| ratio * Decimal::ONE_HUNDRED);
        self.actual_balance = Some(actual);
        self.difference = Some(difference);
        self.difference_percent = difference_percent;
        ActualRecord {
            actual_balance: actual,
            difference,
            difference_percent,
        }
    }
}

fn round(value: Decimal) -> Decimal {
    let rounded =
        value.round_dp_with_strategy(DISPLAY_DIGITS, RoundingStrategy::MidpointAwayFromZero);
    // avoid printing "-0.00"
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// Formats an amount with two decimals and `_` as thousands separator,
/// e.g. `1_250_361.00` or `-50.00`.
pub(crate) fn format_amount(value: Decimal) -> String {
    let rounded = round(value);
    let text = format!("{:.2}", rounded.abs());
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::with_capacity(text.len() + units.len() / 3 + 1);
    if rounded.is_sign_negative() {
        grouped.push('-');
    }
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('_');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(cents);
    grouped
}

pub(crate) fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round(value))
}

/// Parses an amount written by a human or by `format_amount`. Both `,` and `_`
/// are accepted as grouping separators.
pub(crate) fn parse_amount(text: &str) -> Result<Decimal, Error> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    Decimal::from_str(&cleaned).map_err(|_| Error::InvalidAmount(text.trim().to_owned()))
}

/// Serde adapter for amount columns.
pub(crate) mod amount {
    use super::{format_amount, parse_amount, PLACEHOLDER};
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_amount(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_amount(&text).map_err(de::Error::custom)
    }

    /// Same as the parent adapter, with `PLACEHOLDER` standing for `None`.
    pub mod optional {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<Decimal>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.serialize_str(&format_amount(*value)),
                None => serializer.serialize_str(PLACEHOLDER),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Decimal>, D::Error> {
            let text = String::deserialize(deserializer)?;
            if text.trim() == PLACEHOLDER {
                return Ok(None);
            }
            parse_amount(&text).map(Some).map_err(de::Error::custom)
        }
    }
}

/// Serde adapter for the percentage column (`5.00%`, or `PLACEHOLDER`).
pub(crate) mod percent {
    use super::{format_percent, parse_amount, PLACEHOLDER};
    use rust_decimal::Decimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&format_percent(*value)),
            None => serializer.serialize_str(PLACEHOLDER),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        let text = String::deserialize(deserializer)?;
        let text = text.trim();
        if text == PLACEHOLDER {
            return Ok(None);
        }
        parse_amount(text.trim_end_matches('%'))
            .map(Some)
            .map_err(de::Error::custom)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No row dated {0} in the report")]
    DateNotFound(NaiveDate),
    #[error("Input cannot be empty")]
    EmptyInput,
    #[error("Invalid amount {0:?}")]
    InvalidAmount(String),
    #[error("Balance cannot be negative (got {0})")]
    NegativeAmount(Decimal),
    #[error("No valid balance entered after {0} attempts")]
    InputAttemptsExhausted(u32),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Report rows are not in ascending date order at {0}")]
    UnorderedTable(NaiveDate),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(projected: Decimal) -> ReportRow {
        ReportRow {
            date: NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
            day: 1,
            remaining_days: 4,
            increment_percent: dec!(0.01),
            increment_value: Some(dec!(10)),
            projected_balance: projected,
            actual_balance: None,
            difference: None,
            difference_percent: None,
        }
    }

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(dec!(1250361)), "1_250_361.00");
        assert_eq!(format_amount(dec!(1010)), "1_010.00");
        assert_eq!(format_amount(dec!(999.999)), "1_000.00");
        assert_eq!(format_amount(dec!(12.345)), "12.35");
        assert_eq!(format_amount(dec!(0.004)), "0.00");
        assert_eq!(format_amount(dec!(-0.004)), "0.00");
        assert_eq!(format_amount(dec!(-1234567.891)), "-1_234_567.89");
        assert_eq!(format_amount(dec!(-50)), "-50.00");
    }

    #[test]
    fn percents_have_two_decimals() {
        assert_eq!(format_percent(dec!(5)), "5.00%");
        assert_eq!(format_percent(dec!(-0.125)), "-0.13%");
    }

    #[test]
    fn amounts_accept_separators() {
        assert_eq!(parse_amount("1,999,255"), Ok(dec!(1999255)));
        assert_eq!(parse_amount("1_999_255.50"), Ok(dec!(1999255.50)));
        assert_eq!(parse_amount(" 42 "), Ok(dec!(42)));
        assert_eq!(
            parse_amount("12abc"),
            Err(Error::InvalidAmount("12abc".to_owned()))
        );
    }

    #[test]
    fn record_actual_computes_differences() {
        let mut row = row(dec!(1000));
        let record = row.record_actual(dec!(1050));
        assert_eq!(record.difference, dec!(50));
        assert_eq!(record.difference_percent, Some(dec!(5)));
        assert_eq!(format_amount(record.difference), "50.00");
        assert_eq!(format_percent(dec!(5)), "5.00%");
        assert_eq!(row.actual(), Some(record));
    }

    #[test]
    fn record_actual_below_projection() {
        let mut row = row(dec!(1000));
        let record = row.record_actual(dec!(990));
        assert_eq!(record.difference, dec!(-10));
        assert_eq!(record.difference_percent, Some(dec!(-1)));
    }

    #[test]
    fn record_actual_on_zero_projection() {
        let mut row = row(dec!(0));
        let record = row.record_actual(dec!(10));
        assert_eq!(record.difference, dec!(10));
        assert_eq!(record.difference_percent, None);
    }

    #[test]
    fn no_actual_until_recorded() {
        assert_eq!(row(dec!(1000)).actual(), None);
    }
}
