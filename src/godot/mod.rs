//! Godot integration.
//!
//! This module contains the Godot node that exposes the system tray bridge to
//! GDScript through the GDExtension API, and the console forwarding of its
//! diagnostics.

pub mod console;
pub mod system_tray;

pub use system_tray::SystemTray;
