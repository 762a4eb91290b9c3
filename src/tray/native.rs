//! Boundary to the native tray subsystem.
//!
//! The native subsystem owns the OS tray icon and its event loop. It is reached
//! through a single entry point, [`NativeTraySubsystem::put_notify_icon`], and
//! reports back through an [`ActionSink`] carrying wire-shaped actions.

use serde_json::Value;
use std::sync::Arc;

/// Callback receiving wire actions (see [`crate::tray::Action`]).
///
/// May be invoked zero or more times, from any thread, including after
/// `put_notify_icon` has returned.
pub type ActionSink = Arc<dyn Fn(Value) + Send + Sync>;

/// Plain-data menu tree as it crosses the native boundary.
///
/// Click handlers stay on the caller's side; only the ids of clickable nodes
/// are passed along.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NativeMenuItem {
    pub icon: Option<Vec<u8>>,
    pub title: String,
    pub tooltip: Option<String>,
    /// Present only for clickable nodes.
    pub id: Option<String>,
    pub items: Vec<NativeMenuItem>,
}

/// A platform tray facility.
///
/// Implementations are loaded once and live for as long as the bridge holding
/// them. Calling `put_notify_icon` more than once per instance is not supported.
pub trait NativeTraySubsystem: Send + Sync + 'static {
    fn put_notify_icon(&self, tree: NativeMenuItem, callback: ActionSink);
}
