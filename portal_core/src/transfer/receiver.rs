use std::path::PathBuf;
use tracing::{debug, info};

use super::TransferContext;
use super::broker::Broker;
use super::utils::verify_file;
use crate::TransferKey;
use crate::error::{PortalError, Result};

impl<B: Broker> TransferContext<B> {
    /// Resolve `key` and check every exported file
    ///
    /// Returns the verified paths in the order the broker listed them.
    /// With `writable` set each file is overwritten after it passes.
    pub async fn receive(&self, key: &TransferKey) -> Result<Vec<PathBuf>> {
        let files = self.broker.retrieve_files(key).await?;
        if files.is_empty() {
            return Err(PortalError::EmptyTransfer(key.clone()));
        }

        for path in &files {
            debug!("{}", path.display());
            verify_file(path, self.config.writable).await?;
        }

        info!("Verified {} file(s) for key {}", files.len(), key);
        Ok(files)
    }
}
