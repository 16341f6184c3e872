//! Tests for data directory resolution.
//!
//! Kept in its own test binary since it changes process environment.

use portal_core::config::{DATA_DIR_ENV, data_dir};
use std::path::PathBuf;

#[test]
fn test_data_dir_env_override_and_fallback() {
    let temp = tempfile::tempdir().unwrap();

    unsafe {
        std::env::set_var(DATA_DIR_ENV, temp.path());
    }
    assert_eq!(data_dir().unwrap(), temp.path().to_path_buf());

    // Empty value falls back to the XDG data dir
    unsafe {
        std::env::set_var(DATA_DIR_ENV, "");
        std::env::set_var("XDG_DATA_HOME", "/tmp/portal-test-xdg");
    }
    assert_eq!(data_dir().unwrap(), PathBuf::from("/tmp/portal-test-xdg"));

    unsafe {
        std::env::remove_var(DATA_DIR_ENV);
    }
    assert_eq!(data_dir().unwrap(), PathBuf::from("/tmp/portal-test-xdg"));
}
