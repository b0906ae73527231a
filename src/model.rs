use serde::{Deserialize, Serialize};

use crate::transfer::TransferError;

/// Number of text fields in the form.
pub(crate) const FIELD_COUNT: usize = 7;
/// Focus positions: every field plus the submit control.
pub(crate) const FOCUS_POSITIONS: usize = FIELD_COUNT + 1;
pub(crate) const SUBMIT_POSITION: usize = FIELD_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    FilePath,
    TargetPath,
    FileMode,
    TransferMode,
    Username,
    Address,
    Password,
}

impl Field {
    pub(crate) const ALL: [Field; FIELD_COUNT] = [
        Field::FilePath,
        Field::TargetPath,
        Field::FileMode,
        Field::TransferMode,
        Field::Username,
        Field::Address,
        Field::Password,
    ];

    pub(crate) fn from_position(position: usize) -> Option<Field> {
        Self::ALL.get(position).copied()
    }

    pub(crate) fn position(self) -> usize {
        self as usize
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Field::FilePath => "File",
            Field::TargetPath => "Target",
            Field::FileMode => "Kind",
            Field::TransferMode => "Mode",
            Field::Username => "User",
            Field::Address => "Host",
            Field::Password => "Password",
        }
    }

    pub(crate) fn placeholder(self) -> &'static str {
        match self {
            Field::FilePath => "FilePath",
            Field::TargetPath => "TargetPath",
            Field::FileMode => "FileMode: 0=file, 1=folder",
            Field::TransferMode => "Mode: 0=upload, 1=download",
            Field::Username => "Username",
            Field::Address => "Address",
            Field::Password => "Password",
        }
    }

    pub(crate) fn char_limit(self) -> Option<usize> {
        match self {
            Field::Username | Field::Address => Some(64),
            _ => None,
        }
    }

    pub(crate) fn masked(self) -> bool {
        matches!(self, Field::Password)
    }
}

/// The raw values of a submitted form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FormSubmission {
    pub(crate) values: [String; FIELD_COUNT],
}

impl FormSubmission {
    pub(crate) fn value(&self, field: Field) -> &str {
        &self.values[field.position()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormOutcome {
    Submitted(FormSubmission),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileMode {
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransferMode {
    Upload,
    Download,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransferRequest {
    pub(crate) file_path: String,
    pub(crate) target_path: String,
    pub(crate) file_mode: FileMode,
    pub(crate) transfer_mode: TransferMode,
    pub(crate) username: String,
    pub(crate) address: String,
    pub(crate) password: String,
}

impl TransferRequest {
    pub(crate) fn from_submission(submission: &FormSubmission) -> Result<Self, TransferError> {
        let (file_mode, transfer_mode) = parse_modes(
            submission.value(Field::FileMode),
            submission.value(Field::TransferMode),
        )?;
        Ok(Self {
            file_path: submission.value(Field::FilePath).to_string(),
            target_path: submission.value(Field::TargetPath).to_string(),
            file_mode,
            transfer_mode,
            username: submission.value(Field::Username).to_string(),
            address: submission.value(Field::Address).to_string(),
            password: submission.value(Field::Password).to_string(),
        })
    }

    /// One-line description for logs. Never includes the password.
    pub(crate) fn describe(&self) -> String {
        let direction = match self.transfer_mode {
            TransferMode::Upload => "upload",
            TransferMode::Download => "download",
        };
        let kind = match self.file_mode {
            FileMode::File => "file",
            FileMode::Directory => "folder",
        };
        format!(
            "{direction} {kind} {} <-> {}@{}:{}",
            self.file_path, self.username, self.address, self.target_path
        )
    }
}

pub(crate) fn parse_modes(
    file_mode: &str,
    transfer_mode: &str,
) -> Result<(FileMode, TransferMode), TransferError> {
    let file_mode = match parse_flag(file_mode)? {
        0 => FileMode::File,
        _ => FileMode::Directory,
    };
    let transfer_mode = match parse_flag(transfer_mode)? {
        0 => TransferMode::Upload,
        _ => TransferMode::Download,
    };
    Ok((file_mode, transfer_mode))
}

fn parse_flag(raw: &str) -> Result<u8, TransferError> {
    match raw.parse::<i64>() {
        Ok(0) => Ok(0),
        Ok(1) => Ok(1),
        _ => Err(TransferError::InvalidMode),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct HistoryRecord {
    #[serde(default)]
    pub(crate) paths: Vec<String>,
    #[serde(default)]
    pub(crate) targets: Vec<String>,
    #[serde(default)]
    pub(crate) users: Vec<String>,
    #[serde(default)]
    pub(crate) addresses: Vec<String>,
}

impl HistoryRecord {
    pub(crate) fn record(&mut self, request: &TransferRequest) {
        add_unique(&mut self.paths, &request.file_path);
        add_unique(&mut self.targets, &request.target_path);
        add_unique(&mut self.users, &request.username);
        add_unique(&mut self.addresses, &request.address);
    }

    /// The list offered as completions for a field, if it has one.
    pub(crate) fn suggestions_for(&self, field: Field) -> &[String] {
        match field {
            Field::FilePath => &self.paths,
            Field::TargetPath => &self.targets,
            Field::Username => &self.users,
            Field::Address => &self.addresses,
            _ => &[],
        }
    }
}

fn add_unique(list: &mut Vec<String>, value: &str) {
    if value.trim().is_empty() || list.iter().any(|existing| existing == value) {
        return;
    }
    list.push(value.to_string());
}

/// First entry that extends `current` from its start and differs from it.
pub(crate) fn find_suggestion<'a>(candidates: &'a [String], current: &str) -> Option<&'a str> {
    candidates
        .iter()
        .find(|candidate| candidate.starts_with(current) && candidate.as_str() != current)
        .map(String::as_str)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransferSummary {
    pub(crate) direction: TransferMode,
    pub(crate) local_path: String,
    pub(crate) remote_path: String,
    pub(crate) bytes: u64,
}

/// Last `/`-separated segment of a path, ignoring trailing slashes.
pub(crate) fn last_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

pub(crate) fn join_remote(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
