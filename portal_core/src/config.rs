use directories::BaseDirs;
use std::path::PathBuf;

use crate::error::{PortalError, Result};

/// Overrides the directory test files are created in
pub const DATA_DIR_ENV: &str = "PORTAL_TEST_DATA_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferConfig {
    /// Files created per AddFiles call
    pub n_files: u32,
    /// Number of AddFiles calls
    pub n_calls: u32,
    pub writable: bool,
    pub autostop: bool,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            n_files: 1,
            n_calls: 1,
            writable: false,
            autostop: true,
        }
    }
}

impl TransferConfig {
    /// Build a config from raw flag values; zero counts fall back to one
    pub fn new(n_files: u32, n_calls: u32, writable: bool, noautostop: bool) -> Self {
        Self {
            n_files: n_files.max(1),
            n_calls: n_calls.max(1),
            writable,
            autostop: !noautostop,
        }
    }

    /// Total number of files a sender run creates
    pub fn total_files(&self) -> usize {
        self.n_files as usize * self.n_calls as usize
    }
}

/// Get the per-user data directory test files are written to
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    BaseDirs::new()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PortalError::Config("Could not determine user data directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_counts_default_to_one() {
        let config = TransferConfig::new(0, 0, false, false);
        assert_eq!(config.n_files, 1);
        assert_eq!(config.n_calls, 1);
        assert_eq!(config.total_files(), 1);
    }

    #[test]
    fn test_noautostop_inverts() {
        assert!(TransferConfig::new(1, 1, false, false).autostop);
        assert!(!TransferConfig::new(1, 1, false, true).autostop);
        assert_eq!(TransferConfig::new(1, 1, false, false), TransferConfig::default());
    }

    #[test]
    fn test_total_files() {
        let config = TransferConfig::new(3, 2, true, false);
        assert_eq!(config.total_files(), 6);
        assert!(config.writable);
    }
}
