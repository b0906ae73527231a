pub(crate) const MSG_NO_SUBMISSION: &str = "No input submitted. Exiting.";
pub(crate) const MSG_UPLOAD_COMPLETE: &str = "Upload complete!";
pub(crate) const MSG_UPLOAD_FAILED: &str = "Failed to upload file:";
pub(crate) const MSG_DOWNLOAD_COMPLETE: &str = "Download complete:";
pub(crate) const MSG_DOWNLOAD_FAILED: &str = "Download failed:";
pub(crate) const MSG_HISTORY_WARNING: &str = "Warning: Failed to save history:";
pub(crate) const MSG_INSECURE_HOST_KEY: &str =
    "Host key verification disabled: any server key is accepted";
