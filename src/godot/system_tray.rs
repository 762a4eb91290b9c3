//! Godot SystemTray node implementation.
//!
//! This module contains the `SystemTray` Godot node that takes a menu tree
//! described as nested Dictionaries, puts it in the system tray, and runs the
//! `on_click` Callables of activated items.

use crate::godot::console;
use crate::menu::{MenuItem, PossibleMenuItem, RootMenuItem};
use crate::tray::{DeferredQueue, KsniSubsystem, TrayBridge, TraySession};
use godot::builtin::VarDictionary;
use godot::prelude::*;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

#[derive(GodotClass)]
#[class(base=Node)]
/// A Godot node that puts a declarative menu tree into the system tray.
///
/// The tree is a Dictionary with the keys:
///
/// - `icon` - `PackedByteArray` with PNG or ICO data (required on the root)
/// - `title` - `String` shown as the item label (or tray title for the root)
/// - `tooltip` - optional `String`
/// - `items` - optional `Array` of child Dictionaries
/// - `id` and `on_click` - a `String` and a `Callable`; the item is clickable only
///   when both are present
///
/// # Signals
///
/// - `tray_ready()` - Emitted once the tray icon is up
/// - `tray_failed(message: String)` - Emitted if the tray could not be put
///
/// # Example
///
/// ```gdscript
/// var tray = SystemTray.new()
/// add_child(tray)
/// tray.put_system_tray({
///     "icon": FileAccess.get_file_as_bytes("res://icon.png"),
///     "title": "App",
///     "items": [{"id": "quit", "title": "Quit", "on_click": get_tree().quit}],
/// })
/// await tray.tray_ready
/// ```
pub struct SystemTray {
    base: Base<Node>,
    tray_id: String,
    session: TraySession<KsniSubsystem>,
    queue: Arc<DeferredQueue>,
    handlers: Vec<Callable>,
    click_receiver: Option<Receiver<usize>>,
}

#[godot_api]
impl INode for SystemTray {
    fn init(base: Base<Node>) -> Self {
        console::install();
        Self {
            base,
            tray_id: "godot_system_tray".to_string(),
            session: TraySession::new(),
            queue: Arc::new(DeferredQueue::new()),
            handlers: Vec::new(),
            click_receiver: None,
        }
    }

    fn ready(&mut self) {
        self.base_mut().set_process(true);
    }

    fn process(&mut self, _delta: f64) {
        if let Some(result) = self.session.poll() {
            match result {
                Ok(()) => {
                    self.base_mut().emit_signal("tray_ready", &[]);
                }
                Err(e) => {
                    godot_error!("Failed to put system tray: {}", e);
                    self.base_mut()
                        .emit_signal("tray_failed", &[Variant::from(e.to_string())]);
                }
            }
        }

        self.queue.run_pending();

        let mut callables = Vec::new();
        if let Some(ref rx) = self.click_receiver {
            while let Ok(index) = rx.try_recv() {
                if let Some(callable) = self.handlers.get(index) {
                    callables.push(callable.clone());
                }
            }
        }

        // Handlers may call back into this node.
        let _reentrant = self.base_mut();
        for callable in callables {
            callable.call(&[]);
        }
    }
}

#[godot_api]
impl SystemTray {
    /// Signal emitted once the tray icon is up.
    #[signal]
    fn tray_ready();

    /// Signal emitted if the tray icon could not be put.
    ///
    /// # Parameters
    ///
    /// - `message` - The error reported by the tray service
    #[signal]
    fn tray_failed(message: GString);

    /// Sets the identifier of the StatusNotifierItem.
    ///
    /// Must be called before `put_system_tray` to take effect.
    ///
    /// # Parameters
    ///
    /// - `tray_id` - A unique identifier string (e.g., "com.example.myapp")
    #[func]
    fn set_tray_id(&mut self, tray_id: GString) {
        self.tray_id = tray_id.to_string();
    }

    /// Returns the identifier of the StatusNotifierItem.
    #[func]
    fn get_tray_id(&self) -> GString {
        GString::from(self.tray_id.as_str())
    }

    /// Puts the tray icon described by `tree`.
    ///
    /// After `tray_failed` the tray can be put again with a corrected tree.
    ///
    /// # Parameters
    ///
    /// - `tree` - The root menu Dictionary, as described on the class
    ///
    /// # Returns
    ///
    /// Returns `false` if a tray is already pending or up for this node, or if the
    /// root has no icon. Otherwise the outcome arrives through `tray_ready` or `tray_failed`.
    #[func]
    fn put_system_tray(&mut self, tree: VarDictionary) -> bool {
        if self.session.is_active() {
            godot_warn!("System tray already put");
            return false;
        }

        let (tx, rx) = channel();
        let mut handlers = Vec::new();
        let root = match RootMenuItem::try_from(build_menu_item(&tree, &tx, &mut handlers)) {
            Ok(root) => root,
            Err(e) => {
                godot_error!("Failed to put system tray: {}", e);
                return false;
            }
        };

        self.handlers = handlers;
        self.click_receiver = Some(rx);

        let native = Arc::new(KsniSubsystem::new(self.tray_id.clone()));
        let bridge = TrayBridge::new(native, self.queue.clone());
        self.session.put(bridge, Arc::new(root))
    }
}

fn field(dict: &VarDictionary, key: &str) -> Option<Variant> {
    dict.get(key)
}

fn string_field(dict: &VarDictionary, key: &str) -> Option<String> {
    field(dict, key)
        .and_then(|value| value.try_to::<GString>().ok())
        .map(|value| value.to_string())
}

/// Converts a Dictionary node into a menu item.
///
/// Clickable items get a handler that reports the index of their Callable in
/// `handlers` through `clicks`.
fn build_menu_item(
    dict: &VarDictionary,
    clicks: &Sender<usize>,
    handlers: &mut Vec<Callable>,
) -> PossibleMenuItem {
    let mut item = MenuItem::new(string_field(dict, "title").unwrap_or_default());
    item.icon = field(dict, "icon")
        .and_then(|value| value.try_to::<PackedByteArray>().ok())
        .map(|bytes| bytes.to_vec());
    item.tooltip = string_field(dict, "tooltip");

    let children = field(dict, "items").and_then(|value| value.try_to::<Array<Variant>>().ok());
    if let Some(children) = children {
        for child in children.iter_shared() {
            match child.try_to::<VarDictionary>() {
                Ok(child) => item.items.push(build_menu_item(&child, clicks, handlers)),
                Err(_) => godot_warn!("Skipping menu item that is not a Dictionary: {}", child),
            }
        }
    }

    let on_click = field(dict, "on_click").and_then(|value| value.try_to::<Callable>().ok());
    match (string_field(dict, "id"), on_click) {
        (Some(id), Some(callable)) => {
            let index = handlers.len();
            handlers.push(callable);
            let clicks = clicks.clone();
            item.on_click(id, move || {
                let _ = clicks.send(index);
            })
            .into()
        }
        (Some(id), None) => {
            godot_warn!("Menu item '{}' has an id but no on_click Callable", id);
            item.into()
        }
        (None, _) => item.into(),
    }
}
