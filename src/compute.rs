use crate::{
    config::Settings,
    data::{ReportRow, ScheduleDay},
};
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

/// Qualifying days following the start date, plus the number of qualifying days
/// in the whole inclusive range (start included when it qualifies).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Schedule {
    pub days: Vec<ScheduleDay>,
    pub total: u32,
}

pub(crate) fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Enumerates the days in `(start, end]` for which `qualifies` holds, in
/// ascending order. An inverted range yields an empty schedule rather than an
/// error; rejecting it is the job of `Settings::validate`.
pub(crate) fn build_schedule<F>(start: NaiveDate, end: NaiveDate, qualifies: F) -> Schedule
where
    F: Fn(NaiveDate) -> bool,
{
    if end < start {
        return Schedule {
            days: Vec::new(),
            total: 0,
        };
    }
    let range = || start.iter_days().take_while(move |date| *date <= end);
    let total = range().filter(|date| qualifies(*date)).count() as u32;
    let days = range()
        .skip(1)
        .filter(|date| qualifies(*date))
        .zip(1..)
        .map(|(date, day)| ScheduleDay {
            date,
            day,
            remaining_days: total - day,
        })
        .collect();
    Schedule { days, total }
}

/// Compounds `initial_value` over the schedule. The first row is the seed for
/// `start` itself; every following row grows the running balance by `rate`.
/// The running balance keeps full precision, rounding only happens when rows
/// are written out.
pub(crate) fn project(
    start: NaiveDate,
    initial_value: Decimal,
    rate: Decimal,
    schedule: &Schedule,
) -> Vec<ReportRow> {
    let mut rows = Vec::with_capacity(schedule.days.len() + 1);
    rows.push(ReportRow {
        date: start,
        day: 0,
        remaining_days: schedule.total,
        increment_percent: rate,
        increment_value: None,
        projected_balance: initial_value,
        actual_balance: None,
        difference: None,
        difference_percent: None,
    });
    let mut balance = initial_value;
    for day in &schedule.days {
        let increment = balance * rate;
        balance += increment;
        rows.push(ReportRow {
            date: day.date,
            day: day.day,
            remaining_days: day.remaining_days,
            increment_percent: rate,
            increment_value: Some(increment),
            projected_balance: balance,
            actual_balance: None,
            difference: None,
            difference_percent: None,
        });
    }
    rows
}

/// The whole report for the configured range.
pub(crate) fn projection(settings: &Settings) -> Vec<ReportRow> {
    let schedule = build_schedule(settings.start_date, settings.end_date, is_business_day);
    project(
        settings.start_date,
        settings.initial_value,
        settings.growth_rate,
        &schedule,
    )
}
