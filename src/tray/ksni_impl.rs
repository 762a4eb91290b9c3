//! KSNI native tray subsystem.
//!
//! This module implements [`NativeTraySubsystem`] on top of the ksni library,
//! exposing the marshalled menu tree as a StatusNotifierItem and reporting
//! spawn results, activations and shutdown as wire actions.

use crate::tray::action::{Action, ICON_CLICK_ID, UNKNOWN_CLICK_ID};
use crate::tray::native::{ActionSink, NativeMenuItem, NativeTraySubsystem};
use image::ImageFormat;
use ksni::blocking::TrayMethods;
use ksni::menu::{MenuItem, StandardItem, SubMenu};
use std::io::Cursor;
use std::sync::{Arc, Mutex, PoisonError};

/// Implementation of the ksni::Tray trait serving one marshalled menu tree.
pub struct KsniTray {
    /// Identifier of the StatusNotifierItem.
    pub tray_id: String,
    /// The menu tree, root included.
    pub tree: NativeMenuItem,
    /// Decoded root icon.
    pub icon_pixmap: Vec<ksni::Icon>,
    callback: ActionSink,
}

impl KsniTray {
    fn emit(&self, action: Action) {
        (self.callback)(action.to_wire());
    }
}

impl ksni::Tray for KsniTray {
    fn id(&self) -> String {
        self.tray_id.clone()
    }

    fn title(&self) -> String {
        self.tree.title.clone()
    }

    fn icon_pixmap(&self) -> Vec<ksni::Icon> {
        self.icon_pixmap.clone()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            icon_name: String::new(),
            icon_pixmap: vec![],
            title: self
                .tree
                .tooltip
                .clone()
                .unwrap_or_else(|| self.tree.title.clone()),
            description: String::new(),
        }
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        self.emit(Action::Click(ICON_CLICK_ID.to_string()));
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        self.tree
            .items
            .iter()
            .map(|item| build_menu_item(item, &self.callback))
            .collect()
    }

    fn watcher_offline(&self, _reason: ksni::OfflineReason) -> bool {
        tracing::debug!("status notifier watcher went offline");
        self.emit(Action::End);
        false
    }
}

/// Converts a marshalled node into a ksni menu item.
///
/// Nodes with children become submenus; leaves report their id on activation.
pub fn build_menu_item(item: &NativeMenuItem, callback: &ActionSink) -> MenuItem<KsniTray> {
    if item.items.is_empty() {
        let id = item
            .id
            .clone()
            .unwrap_or_else(|| UNKNOWN_CLICK_ID.to_string());
        let callback = Arc::clone(callback);
        StandardItem {
            label: item.title.clone(),
            icon_data: item.icon.clone().unwrap_or_default(),
            activate: Box::new(move |_this: &mut KsniTray| {
                callback(Action::Click(id.clone()).to_wire());
            }),
            ..Default::default()
        }
        .into()
    } else {
        SubMenu {
            label: item.title.clone(),
            icon_data: item.icon.clone().unwrap_or_default(),
            submenu: item
                .items
                .iter()
                .map(|child| build_menu_item(child, callback))
                .collect(),
            ..Default::default()
        }
        .into()
    }
}

/// Decodes PNG or ICO data into the ARGB32 pixmap ksni expects.
pub fn decode_icon(data: &[u8]) -> Result<ksni::Icon, image::ImageError> {
    let rgba = image::load_from_memory(data)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    // Convert RGBA to ARGB for ksni
    let mut argb_data = rgba.into_raw();
    for pixel in argb_data.chunks_exact_mut(4) {
        pixel.rotate_right(1);
    }

    Ok(ksni::Icon {
        width: width as i32,
        height: height as i32,
        data: argb_data,
    })
}

/// Re-encodes menu entry icons as PNG, the only format dbusmenu accepts.
///
/// Icons that cannot be decoded are dropped with a warning.
pub fn prepare_menu_icons(items: &mut [NativeMenuItem]) {
    for item in items {
        if let Some(data) = item.icon.take() {
            match menu_icon_png(&data) {
                Ok(png) => item.icon = Some(png),
                Err(e) => {
                    tracing::warn!(title = %item.title, "dropping undecodable menu icon: {e}");
                }
            }
        }
        prepare_menu_icons(&mut item.items);
    }
}

fn menu_icon_png(data: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    if image::guess_format(data)? == ImageFormat::Png {
        return Ok(data.to_vec());
    }

    let mut png = Cursor::new(Vec::new());
    image::load_from_memory(data)?.write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}

/// Native tray subsystem backed by ksni.
///
/// Holds the spawned tray handle for its own lifetime; dropping the subsystem
/// leaves the tray service to shut down with the handle.
pub struct KsniSubsystem {
    tray_id: String,
    handle: Mutex<Option<ksni::blocking::Handle<KsniTray>>>,
}

impl KsniSubsystem {
    /// Creates a subsystem that has not spawned a tray yet.
    ///
    /// # Parameters
    ///
    /// - `tray_id` - Identifier of the StatusNotifierItem (e.g., "com.example.myapp")
    pub fn new(tray_id: impl Into<String>) -> Self {
        Self {
            tray_id: tray_id.into(),
            handle: Mutex::new(None),
        }
    }

    /// Whether a tray has been spawned through this subsystem.
    pub fn is_spawned(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl NativeTraySubsystem for KsniSubsystem {
    fn put_notify_icon(&self, mut tree: NativeMenuItem, callback: ActionSink) {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            callback(Action::Error("tray already spawned".to_string()).to_wire());
            return;
        }

        let icon_pixmap = match tree.icon.as_deref().map(decode_icon).transpose() {
            Ok(icon) => icon.into_iter().collect(),
            Err(e) => {
                callback(Action::Error(format!("couldn't decode icon: {e}")).to_wire());
                return;
            }
        };
        prepare_menu_icons(&mut tree.items);

        let tray = KsniTray {
            tray_id: self.tray_id.clone(),
            tree,
            icon_pixmap,
            callback: Arc::clone(&callback),
        };

        match tray.spawn() {
            Ok(handle) => {
                *slot = Some(handle);
                drop(slot);
                callback(Action::Ready.to_wire());
            }
            Err(e) => {
                drop(slot);
                callback(Action::Error(e.to_string()).to_wire());
            }
        }
    }
}
