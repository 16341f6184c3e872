/// Well-known name of the document portal
pub const DOCUMENTS_BUS_NAME: &str = "org.freedesktop.portal.Documents";

pub const DOCUMENTS_OBJECT_PATH: &str = "/org/freedesktop/portal/documents";

pub const FILE_TRANSFER_INTERFACE: &str = "org.freedesktop.portal.FileTransfer";

/// Application id that plays the sender role
pub const SENDER_APP_ID: &str = "org.flatpak.PortalTestAppA";

/// Default location of the sandbox identity descriptor
pub const DEFAULT_INFO_PATH: &str = "/.flatpak-info";

/// Text written to every generated file
pub const CONTENTS: &str = "Like a trash can fire in a prison cell\\\n\
                            Like a searchlight in the parking lot of hell";

/// Text a writable receiver puts back
pub const NEW_CONTENTS: &str = "I will walk down to the end with you";
