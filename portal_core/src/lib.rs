use std::fmt;

pub mod config;
pub mod error;
pub mod identity;
pub mod transfer;

pub use config::TransferConfig;
pub use error::{ErrorCategory, PortalError, Result};
pub use identity::{AppIdentity, Role};
pub use transfer::{Broker, LocalBroker, PendingTransfer, PortalBroker, TransferContext};

/// Opaque handle issued by the broker for one transfer session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferKey(String);

impl TransferKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransferKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TransferKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for TransferKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

//Options sent with StartTransfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Receiver may write back to the exported files
    pub writable: bool,
    /// Broker closes the transfer after the first retrieval
    pub autostop: bool,
}

impl From<&TransferConfig> for TransferOptions {
    fn from(config: &TransferConfig) -> Self {
        Self {
            writable: config.writable,
            autostop: config.autostop,
        }
    }
}
