use async_trait::async_trait;
use std::collections::HashMap;
use std::os::fd::{AsRawFd, OwnedFd};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, oneshot};
use tracing::debug;

use super::broker::Broker;
use crate::error::{PortalError, Result};
use crate::{TransferKey, TransferOptions};

#[derive(Debug)]
struct LocalTransfer {
    options: TransferOptions,
    files: Vec<PathBuf>,
}

#[derive(Debug, Default)]
struct LocalState {
    transfers: HashMap<TransferKey, LocalTransfer>,
    subscribers: Vec<oneshot::Sender<TransferKey>>,
}

/// In-process broker with the document portal's FileTransfer semantics
///
/// Keys are random, handles are resolved to paths through `/proc/self/fd`,
/// and an autostop transfer is closed (and TransferClosed emitted to every
/// subscriber) after its first retrieval.
#[derive(Debug, Clone, Default)]
pub struct LocalBroker {
    state: Arc<Mutex<LocalState>>,
}

impl LocalBroker {
    pub fn new() -> Self {
        Self::default()
    }

    // Inspection helpers below let tests observe the broker's side of a
    // transfer; the Broker trait is all the flows use.

    /// Whether `key` still names an open transfer
    pub async fn is_open(&self, key: &TransferKey) -> bool {
        self.state.lock().await.transfers.contains_key(key)
    }

    /// Options the transfer was started with
    pub async fn options(&self, key: &TransferKey) -> Option<TransferOptions> {
        let state = self.state.lock().await;
        state.transfers.get(key).map(|t| t.options)
    }

    /// Close a transfer explicitly, notifying subscribers
    ///
    /// Mirrors the portal's StopTransfer. Tests use it to end a
    /// non-autostop transfer.
    pub async fn stop_transfer(&self, key: &TransferKey) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.transfers.remove(key).is_none() {
            return Err(invalid_transfer("StopTransfer", key));
        }
        notify_closed(&mut state, key);
        Ok(())
    }
}

fn invalid_transfer(call: &'static str, key: &TransferKey) -> PortalError {
    PortalError::broker(call, zbus::Error::Failure(format!("Invalid transfer '{}'", key)))
}

fn notify_closed(state: &mut LocalState, key: &TransferKey) {
    debug!("Transfer {} closed", key);
    for subscriber in state.subscribers.drain(..) {
        let _ = subscriber.send(key.clone());
    }
}

fn add_files_failure(message: String) -> PortalError {
    PortalError::broker("AddFiles", zbus::Error::Failure(message))
}

async fn resolve_fd(fd: &OwnedFd) -> Result<PathBuf> {
    let link = PathBuf::from(format!("/proc/self/fd/{}", fd.as_raw_fd()));
    let path = tokio::fs::read_link(&link)
        .await
        .map_err(|e| add_files_failure(format!("Can't resolve fd: {}", e)))?;

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| add_files_failure(format!("Can't stat {}: {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(add_files_failure(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    Ok(path)
}

#[async_trait]
impl Broker for LocalBroker {
    async fn subscribe_closed(&self) -> Result<oneshot::Receiver<TransferKey>> {
        let (tx, rx) = oneshot::channel();
        self.state.lock().await.subscribers.push(tx);
        Ok(rx)
    }

    async fn start_transfer(&self, options: TransferOptions) -> Result<TransferKey> {
        let key = TransferKey::from(uuid::Uuid::new_v4().simple().to_string());
        self.state.lock().await.transfers.insert(
            key.clone(),
            LocalTransfer {
                options,
                files: Vec::new(),
            },
        );
        Ok(key)
    }

    async fn add_files(&self, key: &TransferKey, files: Vec<OwnedFd>) -> Result<()> {
        let mut paths = Vec::with_capacity(files.len());
        for fd in &files {
            paths.push(resolve_fd(fd).await?);
        }

        let mut state = self.state.lock().await;
        let transfer = state
            .transfers
            .get_mut(key)
            .ok_or_else(|| invalid_transfer("AddFiles", key))?;
        transfer.files.extend(paths);
        Ok(())
    }

    async fn retrieve_files(&self, key: &TransferKey) -> Result<Vec<PathBuf>> {
        let mut state = self.state.lock().await;
        let transfer = state
            .transfers
            .get(key)
            .ok_or_else(|| invalid_transfer("RetrieveFiles", key))?;

        let files = transfer.files.clone();
        if transfer.options.autostop {
            state.transfers.remove(key);
            notify_closed(&mut state, key);
        }

        Ok(files)
    }
}
