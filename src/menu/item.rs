//! Menu item data structures.
//!
//! This module defines the tree handed to the tray bridge: plain label nodes,
//! nodes carrying a click listener, and the root node that owns the tray icon.

use crate::error::TrayError;
use crate::tray::native::NativeMenuItem;
use std::fmt;
use std::sync::Arc;

/// Zero-argument callback run when a clickable menu item is activated.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// A label or submenu node without click behavior.
#[derive(Clone, Debug, Default)]
pub struct MenuItem {
    /// Encoded image data (PNG or ICO) shown next to the item.
    pub icon: Option<Vec<u8>>,
    /// Display text for the item.
    pub title: String,
    /// Text shown when hovering the item, where the platform supports it.
    pub tooltip: Option<String>,
    /// Child nodes, in display order.
    pub items: Vec<PossibleMenuItem>,
}

impl MenuItem {
    /// Creates a node with the given title and no icon, tooltip or children.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the icon from encoded image data.
    ///
    /// # Parameters
    ///
    /// - `icon` - PNG or ICO bytes; menu entries re-encode non-PNG data to PNG
    pub fn with_icon(mut self, icon: impl Into<Vec<u8>>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the text shown when hovering the item.
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Appends a child node.
    pub fn with_item(mut self, item: impl Into<PossibleMenuItem>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Turns this node into a clickable one.
    pub fn on_click<F>(self, id: impl Into<String>, handler: F) -> MenuItemWithClickListener
    where
        F: Fn() + Send + Sync + 'static,
    {
        MenuItemWithClickListener {
            item: self,
            id: id.into(),
            on_click: Arc::new(handler),
        }
    }
}

/// A node that reacts to activation.
///
/// The `id` is what the native subsystem reports back on click, so it should be
/// unique across the whole tree. Lookup returns the first match in pre-order.
#[derive(Clone)]
pub struct MenuItemWithClickListener {
    pub item: MenuItem,
    pub id: String,
    pub on_click: ClickHandler,
}

impl fmt::Debug for MenuItemWithClickListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItemWithClickListener")
            .field("item", &self.item)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Any node of the menu tree.
#[derive(Clone, Debug)]
pub enum PossibleMenuItem {
    /// A node without click behavior.
    Label(MenuItem),
    /// A node carrying an id and a click handler.
    Clickable(MenuItemWithClickListener),
}

impl PossibleMenuItem {
    /// The display data shared by both variants.
    pub fn item(&self) -> &MenuItem {
        match self {
            PossibleMenuItem::Label(item) => item,
            PossibleMenuItem::Clickable(clickable) => &clickable.item,
        }
    }

    fn item_mut(&mut self) -> &mut MenuItem {
        match self {
            PossibleMenuItem::Label(item) => item,
            PossibleMenuItem::Clickable(clickable) => &mut clickable.item,
        }
    }

    /// Child nodes, in display order.
    pub fn children(&self) -> &[PossibleMenuItem] {
        &self.item().items
    }

    /// Returns the click listener if this node has one.
    pub fn as_clickable(&self) -> Option<&MenuItemWithClickListener> {
        match self {
            PossibleMenuItem::Clickable(clickable) => Some(clickable),
            PossibleMenuItem::Label(_) => None,
        }
    }

    /// Marshals this subtree into the plain data handed to the native subsystem.
    pub fn to_native(&self) -> NativeMenuItem {
        let item = self.item();
        NativeMenuItem {
            icon: item.icon.clone(),
            title: item.title.clone(),
            tooltip: item.tooltip.clone(),
            id: self.as_clickable().map(|clickable| clickable.id.clone()),
            items: item.items.iter().map(PossibleMenuItem::to_native).collect(),
        }
    }
}

impl From<MenuItem> for PossibleMenuItem {
    fn from(item: MenuItem) -> Self {
        PossibleMenuItem::Label(item)
    }
}

impl From<MenuItemWithClickListener> for PossibleMenuItem {
    fn from(item: MenuItemWithClickListener) -> Self {
        PossibleMenuItem::Clickable(item)
    }
}

/// The root of the tray menu tree. Always carries the icon displayed in the tray.
#[derive(Clone, Debug)]
pub struct RootMenuItem {
    item: PossibleMenuItem,
}

impl RootMenuItem {
    /// Creates a root from any node, replacing its icon with `icon`.
    pub fn new(icon: impl Into<Vec<u8>>, item: impl Into<PossibleMenuItem>) -> Self {
        let mut item = item.into();
        item.item_mut().icon = Some(icon.into());
        Self { item }
    }

    /// The tray icon data.
    pub fn icon(&self) -> &[u8] {
        self.item.item().icon.as_deref().unwrap_or_default()
    }

    pub fn item(&self) -> &PossibleMenuItem {
        &self.item
    }

    pub fn to_native(&self) -> NativeMenuItem {
        self.item.to_native()
    }
}

impl TryFrom<PossibleMenuItem> for RootMenuItem {
    type Error = TrayError;

    fn try_from(item: PossibleMenuItem) -> Result<Self, Self::Error> {
        match item.item().icon {
            Some(_) => Ok(Self { item }),
            None => Err(TrayError::MissingRootIcon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_requires_icon() {
        let item = PossibleMenuItem::from(MenuItem::new("App"));
        assert_eq!(
            RootMenuItem::try_from(item).unwrap_err(),
            TrayError::MissingRootIcon
        );

        let item = PossibleMenuItem::from(MenuItem::new("App").with_icon(vec![1, 2, 3]));
        let root = RootMenuItem::try_from(item).unwrap();
        assert_eq!(root.icon(), &[1, 2, 3]);
    }

    #[test]
    fn root_new_overrides_item_icon() {
        let root = RootMenuItem::new(vec![9], MenuItem::new("App").with_icon(vec![1]));
        assert_eq!(root.icon(), &[9]);
    }

    #[test]
    fn to_native_keeps_ids_only_for_clickable_nodes() {
        let root = RootMenuItem::new(
            vec![0xAB],
            MenuItem::new("App")
                .with_tooltip("tip")
                .with_item(MenuItem::new("Status"))
                .with_item(
                    MenuItem::new("More").with_item(MenuItem::new("Quit").on_click("quit", || {})),
                ),
        );

        let native = root.to_native();
        assert_eq!(native.icon.as_deref(), Some(&[0xAB][..]));
        assert_eq!(native.title, "App");
        assert_eq!(native.tooltip.as_deref(), Some("tip"));
        assert_eq!(native.id, None);
        assert_eq!(native.items.len(), 2);
        assert_eq!(native.items[0].id, None);
        assert!(native.items[0].items.is_empty());
        assert_eq!(native.items[1].items[0].title, "Quit");
        assert_eq!(native.items[1].items[0].id.as_deref(), Some("quit"));
    }

    #[test]
    fn debug_omits_handler() {
        let item = MenuItem::new("Quit").on_click("quit", || {});
        let rendered = format!("{item:?}");
        assert!(rendered.contains("\"quit\""));
        assert!(!rendered.contains("on_click"));
    }
}
