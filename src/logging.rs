use anyhow::Context;
use chrono::Local;
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::Path,
};

/// Sends every log line to the console and to the log file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Installs the global logger. Defaults to `info`, `RUST_LOG` still applies.
pub(crate) fn init(log_file: &Path) -> Result<(), anyhow::Error> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Cannot open log file {}", log_file.display()))?;
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .write_style(WriteStyle::Never)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(Tee { file })))
        .try_init()?;
    Ok(())
}
