//! Rendering merged log entries

use std::fmt::Display;
use std::io::{self, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, TimeZone};

use super::merge::LogEntry;
use crate::config::{LogConfig, DEFAULT_DATE_FORMAT, DEFAULT_SUMMARY_WIDTH};
use crate::git::{CommitDetail, FileChange};
use crate::{Error, Result};

/// Width of the `-D +I` column in stat lines
const STAT_WIDTH: usize = 12;

/// What to print for each commit
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Per-file insertion/deletion counts
    pub stat: bool,
    /// Full diff text
    pub patch: bool,
    /// `On <date>:` headers between calendar days
    pub split_days: bool,
    /// Maximum summary length in characters
    pub summary_width: usize,
    /// strftime-style timestamp format
    pub date_format: String,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            stat: false,
            patch: false,
            split_days: false,
            summary_width: DEFAULT_SUMMARY_WIDTH,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl LogOptions {
    /// Options with width and date format taken from user configuration
    pub fn from_config(config: &LogConfig) -> Self {
        Self {
            summary_width: config.summary_width,
            date_format: config.date_format.clone(),
            ..Self::default()
        }
    }

    /// Whether commit details have to be loaded for each entry
    pub fn needs_detail(&self) -> bool {
        self.stat || self.patch
    }
}

/// Writes log entries, remembering the last printed day
pub struct LogFormatter<Tz: TimeZone> {
    options: LogOptions,
    tz: Tz,
    last_day: Option<NaiveDate>,
}

impl<Tz> LogFormatter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Create a formatter showing times in `tz`
    ///
    /// Fails if the date format is not a valid strftime string.
    pub fn new(options: LogOptions, tz: Tz) -> Result<Self> {
        if StrftimeItems::new(&options.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Config(format!(
                "invalid date format: {}",
                options.date_format
            )));
        }

        Ok(Self {
            options,
            tz,
            last_day: None,
        })
    }

    pub fn options(&self) -> &LogOptions {
        &self.options
    }

    /// Write one entry
    ///
    /// `detail` is only consulted when `stat` or `patch` is enabled.
    pub fn write_entry<W: Write>(
        &mut self,
        out: &mut W,
        entry: &LogEntry,
        detail: Option<&CommitDetail>,
    ) -> io::Result<()> {
        let commit = &entry.commit;
        let time = commit.time.with_timezone(&self.tz);

        if self.options.split_days {
            let day = time.date_naive();
            if self.last_day != Some(day) {
                writeln!(out, "On {}:", day)?;
                self.last_day = Some(day);
            }
        }

        writeln!(
            out,
            "{} {} {} {} {}",
            time.format(&self.options.date_format),
            commit.short_id(),
            entry.branch.label(),
            initials(&commit.author),
            truncate_summary(&commit.summary, self.options.summary_width),
        )?;

        let Some(detail) = detail else {
            return Ok(());
        };

        if self.options.stat {
            for change in &detail.files {
                writeln!(out, "{}", stat_line(change))?;
            }
        }

        if self.options.patch {
            for change in &detail.files {
                out.write_all(change.patch.as_bytes())?;
                if !change.patch.ends_with('\n') {
                    writeln!(out)?;
                }
                writeln!(out)?;
            }
        }

        Ok(())
    }
}

/// Upper-cased first letter of each word: `Jane Q Doe` gives `JQD`
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Trimmed summary of at most `width` characters
pub fn truncate_summary(summary: &str, width: usize) -> String {
    let truncated: String = summary.trim().chars().take(width).collect();
    truncated.trim_end().to_string()
}

/// `    -D +I path` with the counts right-aligned
pub fn stat_line(change: &FileChange) -> String {
    let counts = format!("-{} +{}", change.deletions, change.insertions);
    format!("    {:>width$} {}", counts, change.path, width = STAT_WIDTH)
}
