use tokio::sync::oneshot;
use tracing::debug;

use super::TransferContext;
use super::broker::Broker;
use super::utils::{create_test_file, open_for_transfer};
use crate::error::{PortalError, Result};
use crate::{TransferKey, TransferOptions};

/// A started transfer whose files are all registered
#[derive(Debug)]
pub struct PendingTransfer {
    key: TransferKey,
    closed_rx: oneshot::Receiver<TransferKey>,
}

impl PendingTransfer {
    pub fn key(&self) -> &TransferKey {
        &self.key
    }

    /// Block until the broker reports this transfer closed
    ///
    /// There is no timeout: if the broker never emits TransferClosed this
    /// never returns. A closure carrying a different key is an error.
    pub async fn wait_closed(self) -> Result<TransferKey> {
        let closed = self
            .closed_rx
            .await
            .map_err(|_| PortalError::SubscriptionClosed)?;

        if closed != self.key {
            return Err(PortalError::KeyMismatch {
                expected: self.key,
                found: closed,
            });
        }

        Ok(closed)
    }
}

impl<B: Broker> TransferContext<B> {
    /// Start a transfer and register every generated file with it
    ///
    /// Subscribes to TransferClosed first so the closure can't be missed,
    /// then runs `n_calls` AddFiles rounds of `n_files` fresh files each.
    pub async fn start_transfer(&self) -> Result<PendingTransfer> {
        let closed_rx = self.broker.subscribe_closed().await?;

        let key = self
            .broker
            .start_transfer(TransferOptions::from(&self.config))
            .await?;
        debug!("Received key '{}'", key);

        for call in 0..self.config.n_calls {
            let mut fds = Vec::with_capacity(self.config.n_files as usize);
            for file in 0..self.config.n_files {
                let path = create_test_file(&self.data_dir, call, file).await?;
                debug!("Add file {}", path.display());
                fds.push(open_for_transfer(&path, self.config.writable).await?);
            }

            // Handles are closed once the call has taken them
            self.broker.add_files(&key, fds).await?;
        }

        Ok(PendingTransfer { key, closed_rx })
    }
}
