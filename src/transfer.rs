use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::archive::archive_dir;
use crate::logging::Logger;
use crate::model::{
    FileMode, TransferMode, TransferRequest, TransferSummary, join_remote, last_segment,
};
use crate::ssh::{ConnectOptions, ScpSession};

/// Permission bits given to uploaded files.
pub(crate) const UPLOAD_MODE: i32 = 0o644;

#[derive(Debug, Error)]
pub(crate) enum TransferError {
    #[error("Invalid mode: expected 0 or 1")]
    InvalidMode,
    #[error("connection failed: {0:#}")]
    Connect(anyhow::Error),
    #[error("{} {}: {}", .action, .path.display(), .source)]
    LocalIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("archive failed: {0:#}")]
    Archive(anyhow::Error),
    #[error("{0:#}")]
    Remote(anyhow::Error),
}

impl TransferError {
    fn local(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIo {
            action,
            path: path.into(),
            source,
        }
    }
}

/// The remote-copy operations the dispatcher needs from a session.
pub(crate) trait RemoteCopy {
    fn upload(
        &mut self,
        local: &mut dyn Read,
        size: u64,
        remote_path: &str,
        mode: i32,
    ) -> anyhow::Result<()>;

    fn download(&mut self, remote_path: &str, local: &mut dyn Write) -> anyhow::Result<u64>;

    /// Copies a remote directory tree into `local_dir`, returning bytes copied.
    fn download_dir(&mut self, remote_dir: &str, local_dir: &Path) -> anyhow::Result<u64>;
}

/// Connects, performs the one requested transfer and disconnects.
pub(crate) fn execute(
    request: &TransferRequest,
    options: &ConnectOptions,
    logger: &Logger,
) -> Result<TransferSummary, TransferError> {
    let mut session = ScpSession::connect(
        &request.address,
        &request.username,
        &request.password,
        options,
    )
    .map_err(TransferError::Connect)?;
    logger.log_line(&format!("Connected to {}", request.address));
    let result = dispatch(&mut session, request, Path::new("."), logger);
    session.close();
    result
}

/// Performs the transfer selected by the request's modes. Downloads land in
/// `work_dir`; folder archives are staged in a private temporary directory.
pub(crate) fn dispatch(
    session: &mut dyn RemoteCopy,
    request: &TransferRequest,
    work_dir: &Path,
    logger: &Logger,
) -> Result<TransferSummary, TransferError> {
    let name = last_segment(&request.file_path);
    match (request.transfer_mode, request.file_mode) {
        (TransferMode::Upload, FileMode::File) => {
            let remote_path = join_remote(&request.target_path, name);
            upload_file(session, Path::new(&request.file_path), &remote_path)
        }
        (TransferMode::Upload, FileMode::Directory) => {
            let staging = tempfile::Builder::new()
                .prefix("scp-form-")
                .tempdir()
                .map_err(|err| {
                    TransferError::local("create staging dir in", std::env::temp_dir(), err)
                })?;
            let archive_name = format!("{name}.zip");
            let archive_path = staging.path().join(&archive_name);
            let entries = archive_dir(Path::new(&request.file_path), &archive_path)
                .map_err(TransferError::Archive)?;
            logger.log_line(&format!(
                "Archived {} entries into {}",
                entries,
                archive_path.display()
            ));
            let remote_path = join_remote(&request.target_path, &archive_name);
            let result = upload_file(session, &archive_path, &remote_path);
            let staging_path = staging.path().to_path_buf();
            match staging.close() {
                Ok(()) => logger.log_line(&format!("Removed {}", staging_path.display())),
                Err(err) => logger.log_line(&format!(
                    "Failed to remove {}: {err}",
                    staging_path.display()
                )),
            }
            result
        }
        (TransferMode::Download, FileMode::File) => {
            let local_path = work_dir.join(name);
            let remote_path = join_remote(&request.target_path, name);
            // Nothing at `local_path` is touched until the download is complete.
            let mut partial = NamedTempFile::new_in(work_dir)
                .map_err(|err| TransferError::local("create temporary file in", work_dir, err))?;
            let bytes = session
                .download(&remote_path, &mut partial)
                .map_err(TransferError::Remote)?;
            partial
                .flush()
                .map_err(|err| TransferError::local("write", &local_path, err))?;
            partial
                .persist(&local_path)
                .map_err(|err| TransferError::local("save", &local_path, err.error))?;
            Ok(TransferSummary {
                direction: TransferMode::Download,
                local_path: local_path.to_string_lossy().into_owned(),
                remote_path,
                bytes,
            })
        }
        (TransferMode::Download, FileMode::Directory) => {
            let local_path = work_dir.join(name);
            let remote_path = join_remote(&request.target_path, name);
            let bytes = session
                .download_dir(&remote_path, &local_path)
                .map_err(TransferError::Remote)?;
            Ok(TransferSummary {
                direction: TransferMode::Download,
                local_path: local_path.to_string_lossy().into_owned(),
                remote_path,
                bytes,
            })
        }
    }
}

fn upload_file(
    session: &mut dyn RemoteCopy,
    local_path: &Path,
    remote_path: &str,
) -> Result<TransferSummary, TransferError> {
    let mut local =
        File::open(local_path).map_err(|err| TransferError::local("open", local_path, err))?;
    let size = local
        .metadata()
        .map_err(|err| TransferError::local("stat", local_path, err))?
        .len();
    session
        .upload(&mut local, size, remote_path, UPLOAD_MODE)
        .map_err(TransferError::Remote)?;
    Ok(TransferSummary {
        direction: TransferMode::Upload,
        local_path: local_path.to_string_lossy().into_owned(),
        remote_path: remote_path.to_string(),
        bytes: size,
    })
}
