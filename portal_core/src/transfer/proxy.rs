use std::collections::HashMap;

use zbus::proxy;
use zbus::zvariant::{Fd, Value};

#[proxy(
    interface = "org.freedesktop.portal.FileTransfer",
    default_service = "org.freedesktop.portal.Documents",
    default_path = "/org/freedesktop/portal/documents",
    gen_blocking = false
)]
pub trait FileTransfer {
    /// Open a transfer session and return its key
    fn start_transfer(&self, options: HashMap<&str, Value<'_>>) -> zbus::Result<String>;

    /// Attach file handles to an open transfer
    fn add_files(
        &self,
        key: &str,
        fds: &[Fd<'_>],
        options: HashMap<&str, Value<'_>>,
    ) -> zbus::Result<()>;

    /// Resolve a key to paths the caller can open
    fn retrieve_files(
        &self,
        key: &str,
        options: HashMap<&str, Value<'_>>,
    ) -> zbus::Result<Vec<String>>;

    #[zbus(signal)]
    fn transfer_closed(&self, key: &str) -> zbus::Result<()>;
}
