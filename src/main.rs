use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Parser;
use compute::projection;
use config::Settings;
use std::path::Path;
use data::{format_amount, format_percent, Error};
use log::{error, info, warn};
use prompt::{read_balance, Console, Terminal};
use store::{GenerateOutcome, ReportStore};

mod compute;
mod config;
mod data;
mod logging;
mod prompt;
mod read;
mod store;
mod write;

/// Projects a compound growth schedule over business days and records the
/// actual balance of the day against it.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Generate the projected report, replacing an existing one after confirmation
    #[arg(long, conflicts_with = "update")]
    generate: bool,
    /// Record today's actual balance in the report
    #[arg(long)]
    update: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    logging::init(Path::new(config::LOG_FILE_PATH))?;
    info!("{:*^80}", " Program started ");
    let settings = checked_settings(Settings::compiled())?;

    let store = ReportStore::new(&settings.data_file);
    let mut console = Terminal;
    let result = if args.generate {
        generate(&settings, &store, &mut console, Local::now().naive_local()).map(drop)
    } else if args.update {
        update(&store, &mut console, Local::now().date_naive())
    } else {
        warn!("No arguments provided. Please use --generate or --update");
        Ok(())
    };
    if let Err(e) = &result {
        error!("{e:#}");
    }
    info!("{:-^80}\n", " Program ended ");
    result
}

/// Settings that failed to build or don't validate are fatal, and logged.
fn checked_settings(settings: Result<Settings, Error>) -> Result<Settings, Error> {
    let checked = settings.and_then(|settings| settings.validate().map(|()| settings));
    if let Err(e) = &checked {
        error!("{e}");
    }
    checked
}

fn generate<C: Console>(
    settings: &Settings,
    store: &ReportStore,
    console: &mut C,
    now: NaiveDateTime,
) -> Result<GenerateOutcome, anyhow::Error> {
    info!(
        "Starting audit report generation from {} to {}",
        settings.start_date, settings.end_date
    );
    let rows = projection(settings);
    let outcome = store.generate(&rows, console, now)?;
    if outcome == GenerateOutcome::Skipped {
        info!("Audit report generation skipped");
    } else {
        info!(
            "Audit report generation completed, {} rows, file: {}",
            rows.len(),
            store.path().display()
        );
    }
    Ok(outcome)
}

/// A date missing from the report is logged and leaves the file alone, it
/// doesn't fail the run. Anything else does. The date is looked up before
/// asking for a balance so nobody types one in for nothing.
fn update<C: Console>(
    store: &ReportStore,
    console: &mut C,
    today: NaiveDate,
) -> Result<(), anyhow::Error> {
    if !store.exists() {
        anyhow::bail!(
            "No report at {}, run with --generate first",
            store.path().display()
        );
    }
    if !store.contains(today)? {
        error!(
            "No row dated {today} in {}, nothing to update",
            store.path().display()
        );
        return Ok(());
    }
    let balance = read_balance(console, today)?;
    match store.update_row(today, balance) {
        Ok(row) => {
            if let Some(record) = row.actual() {
                info!(
                    "Balance of {today} updated to {}",
                    format_amount(record.actual_balance)
                );
                info!(
                    "Difference from projected: {} ({})",
                    format_amount(record.difference),
                    record
                        .difference_percent
                        .map(format_percent)
                        .unwrap_or_else(|| data::PLACEHOLDER.to_owned())
                );
            }
            Ok(())
        }
        Err(e) => match e.downcast_ref::<Error>() {
            Some(Error::DateNotFound(date)) => {
                error!(
                    "No row dated {date} in {}, balance not recorded",
                    store.path().display()
                );
                Ok(())
            }
            _ => Err(e),
        },
    }
}
