//! # godot-systray
//!
//! A Godot 4 GDExtension that puts a declarative menu tree into the system tray and routes
//! tray activity back to GDScript. On Linux the tray is served through the StatusNotifierItem
//! (SNI) specification via the [ksni](https://crates.io/crates/ksni) library.
//!
//! ## Overview
//!
//! The crate is split in two layers:
//!
//! - A host-independent bridge ([`TrayBridge`]) that hands a [`RootMenuItem`] tree to a
//!   [`NativeTraySubsystem`] in a single call, settles a [`PendingTray`] on the first
//!   `ready` or `error` action, and runs the click handler of the activated item on a later
//!   turn through a [`Scheduler`].
//! - A `SystemTray` Godot node that builds the tree from nested Dictionaries, drives the
//!   bridge from `_process`, and exposes the outcome as signals.
//!
//! ## Usage
//!
//! ### Method 1: As a Standalone GDExtension
//!
//! 1. Build the library with default features (includes `gdextension` feature):
//!    ```bash
//!    cargo build --release
//!    ```
//!
//! 2. Create a `GodotSystray.gdextension` file in your Godot project directory:
//!    ```gdextension
//!    [configuration]
//!    entry_symbol = "gdext_rust_init"
//!    compatibility_minimum = 4.5
//!    reloadable = true
//!
//!    [libraries]
//!    linux.debug.x86_64 = "res://../godot-systray/target/debug/libgodot_systray.so"
//!    linux.release.x86_64 = "res://../godot-systray/target/release/libgodot_systray.so"
//!    ```
//!
//! 3. The `SystemTray` node will be available in your Godot project
//!
//! ### Method 2: As a Rust Dependency
//!
//! Disable default features to prevent duplicate `gdext_rust_init` symbols, then either
//! re-export [`SystemTray`] from your own extension or use the bridge directly:
//!
//! ```rust,no_run
//! use godot_systray::{KsniSubsystem, MenuItem, RootMenuItem, TrayBridge};
//! use std::sync::Arc;
//!
//! # async fn run(icon: Vec<u8>) -> godot_systray::Result<()> {
//! let bridge = TrayBridge::with_tokio(Arc::new(KsniSubsystem::new("my_app")));
//! let tray = RootMenuItem::new(
//!     icon,
//!     MenuItem::new("My Application")
//!         .with_item(MenuItem::new("Quit").on_click("quit", || std::process::exit(0))),
//! );
//! bridge.put_system_tray(Arc::new(tray)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Example
//!
//! ```gdscript
//! extends Node
//!
//! func _ready():
//!     var tray = SystemTray.new()
//!     add_child(tray)
//!     tray.set_tray_id("my_app")
//!     tray.tray_failed.connect(func(message): push_error(message))
//!     tray.put_system_tray({
//!         "icon": FileAccess.get_file_as_bytes("res://icon.png"),
//!         "title": "My Application",
//!         "items": [
//!             {"title": "Settings", "items": [
//!                 {"id": "mute", "title": "Mute", "on_click": _on_mute},
//!             ]},
//!             {"id": "quit", "title": "Quit", "on_click": get_tree().quit},
//!         ],
//!     })
//!     await tray.tray_ready
//! ```

// Module declarations
pub mod error;
pub mod godot;
pub mod menu;
pub mod tray;

// Public re-exports
pub use error::{Result, TrayError};
pub use godot::SystemTray;
pub use menu::{
    ClickHandler, MenuItem, MenuItemWithClickListener, PossibleMenuItem, RootMenuItem,
    match_menu_item_id,
};
pub use tray::{
    Action, DeferredQueue, KsniSubsystem, NativeMenuItem, NativeTraySubsystem, PendingTray,
    Scheduler, TokioScheduler, TrayBridge, TraySession,
};

// Conditional GDExtension entry point
#[cfg(feature = "gdextension")]
mod gdextension {
    use godot::prelude::*;

    struct GodotSystrayExtension;

    #[gdextension]
    unsafe impl ExtensionLibrary for GodotSystrayExtension {}
}
