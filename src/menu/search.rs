//! Lookup of clickable nodes by id.

use crate::menu::item::{MenuItemWithClickListener, PossibleMenuItem};

/// Finds the first clickable node whose id equals `id`.
///
/// Nodes are visited in pre-order: a node is checked before its children and
/// children are visited in their declared order. Duplicate ids resolve to the
/// first node encountered.
pub fn match_menu_item_id<'a>(
    items: &'a [PossibleMenuItem],
    id: &str,
) -> Option<&'a MenuItemWithClickListener> {
    for item in items {
        if let Some(clickable) = item.as_clickable()
            && clickable.id == id
        {
            return Some(clickable);
        }
        if let Some(found) = match_menu_item_id(item.children(), id) {
            return Some(found);
        }
    }
    None
}
