//! Chronological log of several branches
//!
//! [`LogMerger`] interleaves the histories, [`LogFormatter`] renders entries,
//! and [`stream_log`] drives both until the histories run out, the reader
//! goes away or the user interrupts.

mod format;
mod merge;

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::TimeZone;

pub use format::{initials, stat_line, truncate_summary, LogFormatter, LogOptions};
pub use merge::{LogEntry, LogMerger};

use crate::git::{CommitDetail, CommitInfo};
use crate::Result;

/// Write merged entries to `out` until done, returning how many were written
///
/// Commit details are only loaded when the formatter prints them. A closed
/// pipe and a raised `cancel` flag both end the stream successfully.
pub fn stream_log<I, W, Tz, F>(
    mut merger: LogMerger<I>,
    formatter: &mut LogFormatter<Tz>,
    out: &mut W,
    mut load_detail: F,
    cancel: &AtomicBool,
) -> Result<usize>
where
    I: Iterator<Item = Result<CommitInfo>>,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
    F: FnMut(&CommitInfo) -> Result<CommitDetail>,
{
    let mut written = 0;

    while !cancel.load(Ordering::SeqCst) {
        let Some(entry) = merger.next() else {
            break;
        };
        let entry = entry?;

        let detail = if formatter.options().needs_detail() {
            Some(load_detail(&entry.commit)?)
        } else {
            None
        };

        match formatter.write_entry(out, &entry, detail.as_ref()) {
            Ok(()) => written += 1,
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                tracing::debug!("output closed after {} entries", written);
                return Ok(written);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if cancel.load(Ordering::SeqCst) {
        tracing::debug!("interrupted after {} entries", written);
    }

    match out.flush() {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e.into()),
        _ => Ok(written),
    }
}
