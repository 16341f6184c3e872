use std::os::fd::OwnedFd;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;

use super::constants::{CONTENTS, NEW_CONTENTS};
use crate::error::{PortalError, Result};

/// Name of the `file`-th file of registration round `call`
pub fn test_file_name(call: u32, file: u32) -> String {
    format!("text_{}_{}.txt", call, file)
}

/// Write the reference contents to a fresh file under `dir`
pub async fn create_test_file(dir: &Path, call: u32, file: u32) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PortalError::io("create directory", dir, e))?;

    let path = dir.join(test_file_name(call, file));
    tokio::fs::write(&path, CONTENTS)
        .await
        .map_err(|e| PortalError::io("write", &path, e))?;

    Ok(path)
}

/// Open a path-only handle suitable for AddFiles
///
/// The access mode still records whether the receiver may write.
pub async fn open_for_transfer(path: &Path, writable: bool) -> Result<OwnedFd> {
    let mut options = OpenOptions::new();
    options.read(true).write(writable);
    #[cfg(target_os = "linux")]
    options.custom_flags(libc::O_PATH);

    let file = options
        .open(path)
        .await
        .map_err(|e| PortalError::io("open", path, e))?;

    Ok(OwnedFd::from(file.into_std().await))
}

/// Check a retrieved file holds the reference contents, then rewrite it if asked
pub async fn verify_file(path: &Path, rewrite: bool) -> Result<()> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| PortalError::io("read", path, e))?;

    if data != CONTENTS.as_bytes() {
        return Err(PortalError::ContentMismatch {
            path: path.to_path_buf(),
            found: String::from_utf8_lossy(&data).into_owned(),
        });
    }

    if rewrite {
        tokio::fs::write(path, NEW_CONTENTS)
            .await
            .map_err(|e| PortalError::io("write", path, e))?;
    }

    Ok(())
}
