use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDateTime};

pub(crate) const LOG_TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";
pub(crate) const LOG_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const LOG_SEPARATOR: &str = " | ";
pub(crate) const LOG_RETENTION_DAYS: i64 = 7;
pub(crate) const LOG_MAX_ENTRIES: usize = 10_000;

/// Append-only event log. Write failures are ignored; the log never stops a
/// transfer.
pub(crate) struct Logger {
    path: PathBuf,
}

impl Logger {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Opens the log at `path` after dropping expired lines.
    pub(crate) fn open(path: PathBuf) -> Self {
        prune_log_file(&path);
        Self::new(path)
    }

    pub(crate) fn log_line(&self, message: &str) {
        let timestamp = chrono::Local::now().format(LOG_TIMESTAMP_FORMAT);
        let line = format!("{timestamp}{LOG_SEPARATOR}{message}");
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(mut file) = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(file, "{line}");
        }
    }
}

/// Rewrites the log keeping only recent, well-formed lines, newest
/// `LOG_MAX_ENTRIES` at most. An empty result removes the file.
pub(crate) fn prune_log_file(path: &Path) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let now = chrono::Local::now().naive_local();
    let cutoff = now - chrono::Duration::days(LOG_RETENTION_DAYS);
    let recent: Vec<&str> = content
        .lines()
        .filter(|line| entry_time(line, now).is_some_and(|logged| logged >= cutoff))
        .collect();
    let kept = &recent[recent.len().saturating_sub(LOG_MAX_ENTRIES)..];
    if kept.is_empty() {
        let _ = fs::remove_file(path);
    } else {
        let _ = fs::write(path, kept.join("\n") + "\n");
    }
}

/// Timestamp of a log line. Lines carry no year, so a date that would lie in
/// the future belongs to the previous year.
fn entry_time(line: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (stamp, _) = line.split_once(LOG_SEPARATOR)?;
    let parse = |year: i32| {
        NaiveDateTime::parse_from_str(&format!("{year}-{stamp}"), LOG_PARSE_FORMAT).ok()
    };
    match parse(now.year()) {
        Some(logged) if logged <= now => Some(logged),
        _ => parse(now.year() - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_log_file_removes_old_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scp-form.log");
        let now = chrono::Local::now().naive_local();
        let old = now - chrono::Duration::days(LOG_RETENTION_DAYS + 1);
        let recent = now - chrono::Duration::days(1);
        let old_line = format!("{}{}old", old.format(LOG_TIMESTAMP_FORMAT), LOG_SEPARATOR);
        let recent_line = format!(
            "{}{}recent",
            recent.format(LOG_TIMESTAMP_FORMAT),
            LOG_SEPARATOR
        );
        fs::write(&path, format!("{old_line}\n{recent_line}\n")).unwrap();
        prune_log_file(&path);
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old"));
        assert!(content.contains("recent"));
    }

    #[test]
    fn log_line_appends_with_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("scp-form.log");
        let logger = Logger::new(path.clone());
        logger.log_line("first");
        logger.log_line("second");
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" | first"));
        assert!(lines[1].ends_with(" | second"));
    }

    #[test]
    fn prune_log_file_keeps_newest_entries_up_to_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scp-form.log");
        let stamp = (chrono::Local::now().naive_local() - chrono::Duration::hours(1))
            .format(LOG_TIMESTAMP_FORMAT)
            .to_string();
        let content: String = (0..LOG_MAX_ENTRIES + 5)
            .map(|index| format!("{stamp}{LOG_SEPARATOR}event {index}\n"))
            .collect();
        fs::write(&path, content).unwrap();

        prune_log_file(&path);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), LOG_MAX_ENTRIES);
        assert!(lines[0].ends_with("event 5"));
        assert!(lines[LOG_MAX_ENTRIES - 1].ends_with(&format!("event {}", LOG_MAX_ENTRIES + 4)));
    }

    #[test]
    fn entry_time_rolls_future_dates_into_last_year() {
        let now = NaiveDateTime::parse_from_str("2026-01-02 10:00:00", LOG_PARSE_FORMAT).unwrap();
        let december = entry_time("12-31 23:00:00 | late", now).unwrap();
        assert_eq!(december.year(), 2025);
        let today = entry_time("01-02 09:00:00 | early", now).unwrap();
        assert_eq!(today.year(), 2026);
        assert_eq!(entry_time("no separator", now), None);
    }

    #[test]
    fn prune_log_file_drops_unparsable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scp-form.log");
        fs::write(&path, "garbage\n").unwrap();
        prune_log_file(&path);
        assert!(!path.exists());
    }
}
