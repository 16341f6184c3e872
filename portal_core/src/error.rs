use std::path::PathBuf;

use thiserror::Error;

use crate::TransferKey;

pub type Result<T> = std::result::Result<T, PortalError>;

/// Coarse grouping of failures, used for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Connectivity,
    Io,
    BrokerCall,
    /// The broker or a file broke an expectation of the test
    Assertion,
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No transfer key specified")]
    MissingKey,

    #[error("Failed to get session bus: {0}")]
    Connect(#[source] zbus::Error),

    #[error("Failed to {op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{call} failed: {source}")]
    Broker {
        call: &'static str,
        #[source]
        source: zbus::Error,
    },

    #[error("TransferClosed subscription ended before the transfer was closed")]
    SubscriptionClosed,

    #[error("File {} does not have the expected content (found {found:?})", path.display())]
    ContentMismatch { path: PathBuf, found: String },

    #[error("TransferClosed carried key '{found}', expected '{expected}'")]
    KeyMismatch {
        expected: TransferKey,
        found: TransferKey,
    },

    #[error("Broker returned no files for key '{0}'")]
    EmptyTransfer(TransferKey),
}

impl PortalError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn broker(call: &'static str, source: zbus::Error) -> Self {
        Self::Broker { call, source }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) | Self::MissingKey => ErrorCategory::Configuration,
            Self::Connect(_) => ErrorCategory::Connectivity,
            Self::Io { .. } => ErrorCategory::Io,
            Self::Broker { .. } | Self::SubscriptionClosed => ErrorCategory::BrokerCall,
            Self::ContentMismatch { .. } | Self::KeyMismatch { .. } | Self::EmptyTransfer(_) => {
                ErrorCategory::Assertion
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_os_code() {
        let source = std::io::Error::from_raw_os_error(libc::ENOENT);
        let err = PortalError::io("open", "/tmp/missing.txt", source);

        assert_eq!(err.category(), ErrorCategory::Io);
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to open /tmp/missing.txt"));

        match err {
            PortalError::Io { source, .. } => {
                assert_eq!(source.raw_os_error(), Some(libc::ENOENT))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_broker_error_names_call() {
        let err = PortalError::broker(
            "RetrieveFiles",
            zbus::Error::Failure("Invalid transfer".into()),
        );
        assert_eq!(err.category(), ErrorCategory::BrokerCall);
        let msg = err.to_string();
        assert!(msg.starts_with("RetrieveFiles failed"));
        assert!(msg.contains("Invalid transfer"));
    }

    #[test]
    fn test_assertion_categories() {
        let key = TransferKey::from("1234");
        assert_eq!(
            PortalError::EmptyTransfer(key.clone()).category(),
            ErrorCategory::Assertion
        );
        assert_eq!(
            PortalError::KeyMismatch {
                expected: key,
                found: TransferKey::from("5678"),
            }
            .category(),
            ErrorCategory::Assertion
        );
        assert_eq!(PortalError::MissingKey.category(), ErrorCategory::Configuration);
    }
}
