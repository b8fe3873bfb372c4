use crate::data::Error;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;

const START_DATE: (i32, u32, u32) = (2025, 3, 20);
const END_DATE: (i32, u32, u32) = (2029, 1, 20);
const INITIAL_VALUE: Decimal = dec!(1250361.00);
/// 0.51% per business day
const GROWTH_RATE: Decimal = dec!(0.0051);
const DATA_FILE_PATH: &str = "data/audit_data.csv";
/// Fixed so that logging can start before anything else, settings included.
pub const LOG_FILE_PATH: &str = "logs/log.log";

/// Everything a run needs to know. Built once at startup and handed to the
/// components that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    /// First day of the audit; its row carries the initial value.
    pub start_date: NaiveDate,
    /// Last day of the audit, inclusive.
    pub end_date: NaiveDate,
    pub initial_value: Decimal,
    pub growth_rate: Decimal,
    pub data_file: PathBuf,
}

fn date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate, Error> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| Error::InvalidConfig(format!("{year}-{month}-{day} is not a date")))
}

impl Settings {
    /// Settings compiled into the binary.
    pub fn compiled() -> Result<Self, Error> {
        Ok(Self {
            start_date: date(START_DATE)?,
            end_date: date(END_DATE)?,
            initial_value: INITIAL_VALUE,
            growth_rate: GROWTH_RATE,
            data_file: PathBuf::from(DATA_FILE_PATH),
        })
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.end_date < self.start_date {
            return Err(Error::InvalidConfig(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.initial_value.is_sign_negative() && !self.initial_value.is_zero() {
            return Err(Error::InvalidConfig(format!(
                "initial value {} is negative",
                self.initial_value
            )));
        }
        if self.growth_rate.is_sign_negative() && !self.growth_rate.is_zero() {
            return Err(Error::InvalidConfig(format!(
                "growth rate {} is negative",
                self.growth_rate
            )));
        }
        Ok(())
    }
}
