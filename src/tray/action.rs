//! Actions emitted by the native tray subsystem.
//!
//! The native side reports everything through one callback taking a single-key
//! JSON object. This module decodes that wire shape once into [`Action`].

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Value, json};

/// Click id reported when the tray icon itself is activated.
pub const ICON_CLICK_ID: &str = "#";
/// Click id reported for an activated node that carries no id.
pub const UNKNOWN_CLICK_ID: &str = "?";

/// One notification from the native tray subsystem.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// The tray icon is up.
    Ready,
    /// Initialization or runtime failure.
    Error(String),
    /// The tray icon was removed.
    End,
    /// A menu node was activated.
    Click(String),
    /// Anything that does not match the shapes above.
    Unknown(Value),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum WireAction {
    Ready(IgnoredAny),
    Error(String),
    End(IgnoredAny),
    Click(String),
}

impl Action {
    /// Decodes a wire message. Unrecognized shapes become [`Action::Unknown`].
    pub fn decode(wire: Value) -> Self {
        match WireAction::deserialize(&wire) {
            Ok(WireAction::Ready(_)) => Action::Ready,
            Ok(WireAction::Error(message)) => Action::Error(message),
            Ok(WireAction::End(_)) => Action::End,
            Ok(WireAction::Click(id)) => Action::Click(id),
            Err(_) => Action::Unknown(wire),
        }
    }

    /// Encodes the canonical wire message for this action.
    pub fn to_wire(&self) -> Value {
        match self {
            Action::Ready => json!({ "ready": "" }),
            Action::Error(message) => json!({ "error": message }),
            Action::End => json!({ "end": "" }),
            Action::Click(id) => json!({ "click": id }),
            Action::Unknown(raw) => raw.clone(),
        }
    }
}
