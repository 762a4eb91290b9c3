//! Errors surfaced by the tray bridge.

use thiserror::Error;

/// Failures observable by callers of the tray bridge.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrayError {
    /// The native subsystem reported an error before the tray became ready.
    ///
    /// Displays exactly the message supplied by the native layer.
    #[error("{0}")]
    Native(String),

    /// A root menu item was built without the icon shown in the tray.
    #[error("root menu item requires an icon")]
    MissingRootIcon,

    /// The native subsystem released its callback without ever settling.
    #[error("native tray released its callback before reporting ready or error")]
    Detached,
}

pub type Result<T> = std::result::Result<T, TrayError>;
