use std::path::Path;

use crate::transfer::constants::SENDER_APP_ID;

const APPLICATION_GROUP: &str = "Application";
const NAME_KEY: &str = "name";

/// Which end of a transfer this process plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Starts transfers and registers files
    Sender,
    /// Resolves a transfer key and verifies the files
    Receiver,
}

/// Application identity read from the sandbox descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppIdentity {
    app_id: Option<String>,
}

impl AppIdentity {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
        }
    }

    /// Load the identity from a key-file descriptor
    ///
    /// A missing or unreadable descriptor yields an anonymous identity,
    /// which always selects the receiver role.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self {
                app_id: keyfile_value(&content, APPLICATION_GROUP, NAME_KEY),
            },
            Err(e) => {
                tracing::debug!("Could not read identity from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    pub fn role(&self) -> Role {
        match self.app_id() {
            Some(id) if id == SENDER_APP_ID => Role::Sender,
            _ => Role::Receiver,
        }
    }
}

/// Look up `key` in `[group]` of a GLib-style key file
///
/// A key repeated within the group resolves to its last occurrence.
pub fn keyfile_value(content: &str, group: &str, key: &str) -> Option<String> {
    let mut in_group = false;
    let mut found = None;

    for line in content.lines() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[') {
            in_group = name.trim_end().strip_suffix(']') == Some(group);
            continue;
        }

        if !in_group {
            continue;
        }

        if let Some((k, v)) = line.split_once('=') {
            if k.trim_end() == key {
                found = Some(unescape(v.trim_start()));
            }
        }
    }

    found
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLATPAK_INFO: &str = "\
[Application]
name=org.flatpak.PortalTestAppA
runtime=runtime/org.freedesktop.Platform/x86_64/23.08

# comment
[Instance]
name=not-this-one
";

    #[test]
    fn test_keyfile_value_reads_group() {
        assert_eq!(
            keyfile_value(FLATPAK_INFO, "Application", "name").as_deref(),
            Some("org.flatpak.PortalTestAppA")
        );
        assert_eq!(
            keyfile_value(FLATPAK_INFO, "Instance", "name").as_deref(),
            Some("not-this-one")
        );
        assert_eq!(keyfile_value(FLATPAK_INFO, "Application", "missing"), None);
        assert_eq!(keyfile_value(FLATPAK_INFO, "Nope", "name"), None);
    }

    #[test]
    fn test_keyfile_value_whitespace_and_escapes() {
        let content = "[Application]\nname = \\sPadded\\tname\\\\\n";
        assert_eq!(
            keyfile_value(content, "Application", "name").as_deref(),
            Some(" Padded\tname\\")
        );
    }

    #[test]
    fn test_keyfile_value_last_duplicate_wins() {
        let content = "\
[Application]
name=org.flatpak.PortalTestAppB
[Instance]
name=ignored
[Application]
name=org.flatpak.PortalTestAppA
";
        assert_eq!(
            keyfile_value(content, "Application", "name").as_deref(),
            Some(SENDER_APP_ID)
        );
        assert_eq!(
            keyfile_value("[Application]\nname=first\nname=second\n", "Application", "name")
                .as_deref(),
            Some("second")
        );
    }

    #[test]
    fn test_role_selection() {
        assert_eq!(AppIdentity::new(SENDER_APP_ID).role(), Role::Sender);
        assert_eq!(
            AppIdentity::new("org.flatpak.PortalTestAppB").role(),
            Role::Receiver
        );
        assert_eq!(AppIdentity::default().role(), Role::Receiver);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".flatpak-info");
        std::fs::write(&path, FLATPAK_INFO).unwrap();

        let identity = AppIdentity::load(&path);
        assert_eq!(identity.app_id(), Some(SENDER_APP_ID));
        assert_eq!(identity.role(), Role::Sender);
    }

    #[test]
    fn test_load_missing_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let identity = AppIdentity::load(&dir.path().join("does-not-exist"));
        assert_eq!(identity.app_id(), None);
        assert_eq!(identity.role(), Role::Receiver);
    }
}
