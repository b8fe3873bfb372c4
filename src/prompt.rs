use crate::data::{parse_amount, Error};
use chrono::NaiveDate;
use log::{error, warn};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

pub const MAX_ATTEMPTS: u32 = 3;

/// Where questions are asked and answers read. The terminal in production,
/// a scripted list of answers in tests.
pub(crate) trait Console {
    /// Shows `question` and returns the answer line. End of input is an empty answer.
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

pub(crate) struct Terminal;

impl Console for Terminal {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(question.as_bytes())?;
        stdout.flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }
}

/// Only an explicit `y` resets.
pub(crate) fn confirm_reset<C: Console>(console: &mut C) -> io::Result<bool> {
    let answer = console.ask("Do you want to reset it? (y/n): ")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Validates one answer: grouping separators (`1,999,255` or `1_999_255`) are
/// fine, empty and negative amounts are not.
pub(crate) fn parse_balance(answer: &str) -> Result<Decimal, Error> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(Error::EmptyInput);
    }
    let balance = parse_amount(answer)?;
    if balance.is_sign_negative() && !balance.is_zero() {
        return Err(Error::NegativeAmount(balance));
    }
    Ok(balance)
}

/// Asks for the balance on `date` until a valid one is given, at most
/// `MAX_ATTEMPTS` times in total.
pub(crate) fn read_balance<C: Console>(
    console: &mut C,
    date: NaiveDate,
) -> Result<Decimal, anyhow::Error> {
    for attempt in 1..=MAX_ATTEMPTS {
        let answer = console.ask(&format!("Enter the balance on {date}: "))?;
        match parse_balance(&answer) {
            Ok(balance) => return Ok(balance),
            Err(e) => warn!(
                "{e}. Please enter a valid amount, {} attempts remaining.",
                MAX_ATTEMPTS - attempt
            ),
        }
    }
    error!("Invalid input {MAX_ATTEMPTS} times, giving up");
    Err(Error::InputAttemptsExhausted(MAX_ATTEMPTS).into())
}
