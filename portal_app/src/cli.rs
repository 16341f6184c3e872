//! Command-line flags

use clap::Parser;
use portal_core::{PortalError, Result, TransferConfig, TransferKey};
use portal_core::transfer::constants::DEFAULT_INFO_PATH;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "portal-test-app",
    version,
    about = "Exercise the FileTransfer portal as sender or receiver"
)]
pub struct Cli {
    /// Print debug information
    #[arg(long)]
    pub verbose: bool,

    /// Number of files
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub n_files: u32,

    /// Number of Add calls
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub n_calls: u32,

    /// Make files writable
    #[arg(long)]
    pub writable: bool,

    /// Allow multiple transfers
    #[arg(long)]
    pub noautostop: bool,

    /// Identity descriptor used to pick the role
    #[arg(long, value_name = "PATH", env = "PORTAL_TEST_INFO_PATH", default_value = DEFAULT_INFO_PATH)]
    pub info_path: PathBuf,

    /// Transfer key to retrieve (receiver only)
    #[arg(value_name = "KEY")]
    pub key: Option<String>,
}

impl Cli {
    pub fn transfer_config(&self) -> TransferConfig {
        TransferConfig::new(self.n_files, self.n_calls, self.writable, self.noautostop)
    }

    /// Key a receiver run resolves; its absence is a configuration error
    pub fn receiver_key(&self) -> Result<TransferKey> {
        self.key
            .as_deref()
            .map(TransferKey::from)
            .ok_or(PortalError::MissingKey)
    }
}
