use crate::{
    data::{Error, ReportRow},
    prompt::{confirm_reset, Console},
    read::read_report,
    write::{check_order, write_report},
};
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use rust_decimal::Decimal;
use std::{
    ffi::OsString,
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GenerateOutcome {
    /// No previous report, the new one was written.
    Written,
    /// The previous report was moved to `backup` before writing.
    Replaced { backup: PathBuf },
    /// The user kept the previous report; nothing was touched.
    Skipped,
}

/// The report file on disk. Every operation loads or writes the whole table;
/// nothing is kept in memory between calls.
#[derive(Debug, Clone)]
pub(crate) struct ReportStore {
    path: PathBuf,
}

/// `<file>_<timestamp>.csv` next to `path`, with a counter appended if that
/// name is already taken.
pub(crate) fn backup_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    let stamp = now.format("%Y-%m-%d_%H-%M-%S").to_string();
    let candidate = |suffix: &str| {
        let mut name = OsString::from(path.as_os_str());
        name.push(format!("_{stamp}{suffix}.csv"));
        PathBuf::from(name)
    };
    let mut backup = candidate("");
    let mut counter = 1;
    while backup.exists() {
        backup = candidate(&format!("-{counter}"));
        counter += 1;
    }
    backup
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> Result<Vec<ReportRow>, anyhow::Error> {
        let file = fs::File::open(&self.path)
            .with_context(|| format!("Cannot open report {}", self.path.display()))?;
        read_report(file).with_context(|| format!("Cannot read report {}", self.path.display()))
    }

    /// Replaces the file with `rows`, creating its directory if needed. The
    /// table goes to a `.temp` sibling first and is renamed over the report
    /// once complete, so a rejected table leaves the report untouched.
    pub fn save(&self, rows: &[ReportRow]) -> Result<(), anyhow::Error> {
        check_order(rows)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create directory {}", dir.display()))?;
        }
        let mut temp = OsString::from(self.path.as_os_str());
        temp.push(".temp");
        let temp = PathBuf::from(temp);
        let file = fs::File::create(&temp)
            .with_context(|| format!("Cannot create {}", temp.display()))?;
        if let Err(e) = write_report(BufWriter::new(file), rows) {
            let _ = fs::remove_file(&temp);
            return Err(e.context(format!("Cannot write report {}", self.path.display())));
        }
        fs::rename(&temp, &self.path)
            .with_context(|| format!("Cannot replace report {}", self.path.display()))
    }

    /// Whether the stored report has a row dated `date`.
    pub fn contains(&self, date: NaiveDate) -> Result<bool, anyhow::Error> {
        Ok(self.load()?.iter().any(|row| row.date == date))
    }

    /// Writes a freshly generated table. An existing report is only replaced if
    /// the user agrees, and it is renamed to a backup first.
    pub fn generate<C: Console>(
        &self,
        rows: &[ReportRow],
        console: &mut C,
        now: NaiveDateTime,
    ) -> Result<GenerateOutcome, anyhow::Error> {
        let mut outcome = GenerateOutcome::Written;
        if self.exists() {
            warn!("{} already exists", self.path.display());
            if !confirm_reset(console)? {
                info!("Keeping the existing report");
                return Ok(GenerateOutcome::Skipped);
            }
            let backup = backup_path(&self.path, now);
            fs::rename(&self.path, &backup).with_context(|| {
                format!(
                    "Cannot move {} to {}",
                    self.path.display(),
                    backup.display()
                )
            })?;
            info!("Backup of old file created: {}", backup.display());
            outcome = GenerateOutcome::Replaced { backup };
        }
        self.save(rows)?;
        Ok(outcome)
    }

    /// Records `actual` on the row dated `date` and writes the table back.
    /// If no row has that date, fails with `Error::DateNotFound` and leaves
    /// the file alone.
    pub fn update_row(
        &self,
        date: NaiveDate,
        actual: Decimal,
    ) -> Result<ReportRow, anyhow::Error> {
        let mut rows = self.load()?;
        let row = rows
            .iter_mut()
            .find(|row| row.date == date)
            .ok_or(Error::DateNotFound(date))?;
        row.record_actual(actual);
        let updated = row.clone();
        self.save(&rows)?;
        Ok(updated)
    }
}
