//! Menu tree data structures.
//!
//! This module defines the menu tree handed to the tray bridge, including label
//! nodes, clickable nodes and the icon-carrying root, plus lookup by click id.

pub mod item;
pub mod search;

pub use item::{ClickHandler, MenuItem, MenuItemWithClickListener, PossibleMenuItem, RootMenuItem};
pub use search::match_menu_item_id;
