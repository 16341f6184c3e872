use async_trait::async_trait;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::os::fd::{AsFd, OwnedFd};
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use zbus::Connection;
use zbus::zvariant::{Fd, Value};

use super::constants::{DOCUMENTS_BUS_NAME, DOCUMENTS_OBJECT_PATH, FILE_TRANSFER_INTERFACE};
use super::proxy::FileTransferProxy;
use crate::error::{PortalError, Result};
use crate::{TransferKey, TransferOptions};

/// The file-transfer service as seen by the sender and receiver flows
#[async_trait]
pub trait Broker: Send + Sync {
    /// Subscribe to TransferClosed; the receiver yields the first closed key
    async fn subscribe_closed(&self) -> Result<oneshot::Receiver<TransferKey>>;

    async fn start_transfer(&self, options: TransferOptions) -> Result<TransferKey>;

    /// Hand ownership of `files` to the transfer identified by `key`
    async fn add_files(&self, key: &TransferKey, files: Vec<OwnedFd>) -> Result<()>;

    async fn retrieve_files(&self, key: &TransferKey) -> Result<Vec<PathBuf>>;
}

/// Broker backed by the document portal on the session bus
pub struct PortalBroker {
    proxy: FileTransferProxy<'static>,
}

impl PortalBroker {
    /// Connect to the session bus and bind the FileTransfer proxy
    pub async fn connect() -> Result<Self> {
        let connection = Connection::session().await.map_err(PortalError::Connect)?;
        Self::with_connection(&connection).await
    }

    pub async fn with_connection(connection: &Connection) -> Result<Self> {
        debug!(
            "Binding {} at {} on {}",
            FILE_TRANSFER_INTERFACE, DOCUMENTS_OBJECT_PATH, DOCUMENTS_BUS_NAME
        );

        let proxy = FileTransferProxy::builder(connection)
            .destination(DOCUMENTS_BUS_NAME)
            .and_then(|b| b.path(DOCUMENTS_OBJECT_PATH))
            .map_err(PortalError::Connect)?
            .build()
            .await
            .map_err(PortalError::Connect)?;

        Ok(Self { proxy })
    }
}

#[async_trait]
impl Broker for PortalBroker {
    async fn subscribe_closed(&self) -> Result<oneshot::Receiver<TransferKey>> {
        debug!("Connecting to TransferClosed");

        let stream = self
            .proxy
            .receive_transfer_closed()
            .await
            .map_err(|e| PortalError::broker("Subscribing to TransferClosed", e))?;

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let mut stream = std::pin::pin!(stream);
            while let Some(signal) = stream.next().await {
                debug!("Received TransferClosed");
                match signal.args() {
                    Ok(args) => {
                        let _ = tx.send(TransferKey::from(args.key().to_string()));
                        return;
                    }
                    Err(e) => warn!("Ignoring malformed TransferClosed: {}", e),
                }
            }
        });

        Ok(rx)
    }

    async fn start_transfer(&self, options: TransferOptions) -> Result<TransferKey> {
        debug!("Calling StartTransfer");

        let mut opts: HashMap<&str, Value<'_>> = HashMap::new();
        opts.insert("writable", Value::from(options.writable));
        opts.insert("autostop", Value::from(options.autostop));

        let key = self
            .proxy
            .start_transfer(opts)
            .await
            .map_err(|e| PortalError::broker("StartTransfer", e))?;

        Ok(TransferKey::from(key))
    }

    async fn add_files(&self, key: &TransferKey, files: Vec<OwnedFd>) -> Result<()> {
        debug!("Calling AddFiles");

        let fds: Vec<Fd<'_>> = files.iter().map(|f| Fd::from(f.as_fd())).collect();
        self.proxy
            .add_files(key.as_str(), &fds, HashMap::new())
            .await
            .map_err(|e| PortalError::broker("AddFiles", e))?;

        Ok(())
    }

    async fn retrieve_files(&self, key: &TransferKey) -> Result<Vec<PathBuf>> {
        debug!("Calling RetrieveFiles");

        let files = self
            .proxy
            .retrieve_files(key.as_str(), HashMap::new())
            .await
            .map_err(|e| PortalError::broker("RetrieveFiles", e))?;

        Ok(files.into_iter().map(PathBuf::from).collect())
    }
}
