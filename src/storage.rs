use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::logging::Logger;
use crate::model::{HistoryRecord, TransferRequest};

const APP_DIR: &str = "scp-form";

pub(crate) fn history_path() -> Result<PathBuf> {
    if let Some(mut dir) = dirs::config_dir() {
        dir.push(APP_DIR);
        dir.push("history.json");
        return Ok(dir);
    }
    let mut fallback = std::env::current_dir().context("current dir")?;
    fallback.push("history.json");
    Ok(fallback)
}

pub(crate) fn log_path() -> Result<PathBuf> {
    if let Some(mut dir) = dirs::data_local_dir() {
        dir.push(APP_DIR);
        dir.push("scp-form.log");
        return Ok(dir);
    }
    let mut fallback = std::env::current_dir().context("current dir")?;
    fallback.push("scp-form.log");
    Ok(fallback)
}

/// Reads the history file. A missing or unreadable file is a first run.
pub(crate) fn load_history(path: &Path, logger: &Logger) -> HistoryRecord {
    match read_history(path) {
        Ok(history) => {
            logger.log_line(&format!("Loaded history from {}", path.display()));
            history
        }
        Err(err) => {
            logger.log_line(&format!("Starting with empty history: {err:#}"));
            HistoryRecord::default()
        }
    }
}

fn read_history(path: &Path) -> Result<HistoryRecord> {
    let content = fs::read_to_string(path).context("read history file")?;
    let history = serde_json::from_str(&content).context("parse history file")?;
    Ok(history)
}

pub(crate) fn save_history(
    path: &Path,
    request: &TransferRequest,
    history: &mut HistoryRecord,
) -> Result<()> {
    history.record(request);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("create history dir")?;
        }
    }
    let content = serde_json::to_string_pretty(history).context("serialize history")?;
    fs::write(path, content).context("write history file")?;
    Ok(())
}
