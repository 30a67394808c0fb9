//! Shared utilities for CLI commands.

use anyhow::{Context, Result, bail};
use bcal_core::{RawLogRow, Timeline};
use bcal_source::{Client, LogSource};
use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::Config;

/// Date formats accepted by `--date`, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Resolves the current time, honouring a `--now` override.
pub fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime> {
    match now {
        Some(s) => bcal_core::parse_timestamp(s).with_context(|| format!("invalid --now: {s}")),
        None => Ok(Local::now().naive_local()),
    }
}

/// Parses a calendar date as `YYYY-MM-DD` or `M/D/YY`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .with_context(|| format!("Invalid date: {s}. Use YYYY-MM-DD (e.g., 2019-06-05) or M/D/YY"))
}

/// Reads all rows from the given source.
pub fn load_rows(source: &LogSource, config: &Config) -> Result<Vec<RawLogRow>> {
    let rows = match source {
        LogSource::Remote(url) => {
            let client = Client::new(config.timeout()).context("failed to create HTTP client")?;
            let runtime =
                tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
            runtime.block_on(client.fetch_rows(url))?
        }
        LogSource::File(path) => bcal_source::read_rows(path)?,
        LogSource::Stdin => bcal_source::read_rows_from(std::io::stdin().lock(), "<stdin>")?,
    };
    Ok(rows)
}

/// Fetches the log and runs the pipeline over it.
pub fn build_timeline(source: Option<&str>, now: Option<&str>, config: &Config) -> Result<Timeline> {
    let Some(source) = source.or(config.source.as_deref()) else {
        bail!("no log source configured (pass --source or set BCAL_SOURCE)");
    };
    let source = LogSource::parse(source);
    let now = resolve_now(now)?;

    let rows = load_rows(&source, config).with_context(|| format!("failed to load log from {source}"))?;
    tracing::debug!(%source, rows = rows.len(), %now, "loaded log");

    let timeline = bcal_core::run(&rows, &config.pipeline, now).context("failed to process log")?;
    Ok(timeline)
}

/// A fixed timeline shared by command tests.
#[cfg(test)]
pub(crate) fn sample_timeline() -> Timeline {
    let rows = [
        ("June 4, 2019 at 10:19PM", "asleep"),
        ("June 5, 2019 at 11:19AM", "awake"),
        ("June 5, 2019 at 11:25AM", "took 90"),
        ("June 5, 2019 at 11:50AM", "took 30"),
        ("June 5, 2019 at 11:55AM", "pooped"),
    ]
    .map(|(ts, activity)| RawLogRow::new(ts, activity));
    let now = resolve_now(Some("June 5, 2019 at 12:00PM")).unwrap();
    bcal_core::run(&rows, &bcal_core::PipelineConfig::default(), now).unwrap()
}
