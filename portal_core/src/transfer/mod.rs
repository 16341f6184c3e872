//! FileTransfer portal client.
//!
//! This module provides:
//! - The D-Bus proxy for `org.freedesktop.portal.FileTransfer`
//! - A `Broker` seam with a session-bus and an in-process implementation
//! - Sender flow: create files, register them, wait for TransferClosed
//! - Receiver flow: resolve a key and verify the exported files

pub mod broker;
pub mod constants;
pub mod local;
pub mod proxy;
pub mod receiver;
pub mod sender;
pub mod utils;

use std::path::PathBuf;

use crate::TransferConfig;

// Re-export public API
pub use broker::{Broker, PortalBroker};
pub use local::LocalBroker;
pub use sender::PendingTransfer;

/// Everything a sender or receiver run needs
pub struct TransferContext<B> {
    broker: B,
    config: TransferConfig,
    data_dir: PathBuf,
}

impl<B: Broker> TransferContext<B> {
    pub fn new(broker: B, config: TransferConfig, data_dir: PathBuf) -> Self {
        Self {
            broker,
            config,
            data_dir,
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }
}
