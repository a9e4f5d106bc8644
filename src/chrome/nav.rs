//! Mobile navigation toggle.

use crate::dom::{Document, NodeId};

/// Class marking the open menu.
pub const OPEN_CLASS: &str = "active";

/// Flip the open state of both the menu and the burger icon.
pub fn toggle(doc: &mut Document, burger: NodeId, links: NodeId) -> bool {
    let open = doc[links].toggle_class(OPEN_CLASS);
    doc[burger].toggle_class(OPEN_CLASS);
    open
}

/// Close the menu if it is open. Returns whether anything changed.
pub fn close(doc: &mut Document, burger: Option<NodeId>, links: NodeId) -> bool {
    if !doc[links].has_class(OPEN_CLASS) {
        return false;
    }
    doc[links].remove_class(OPEN_CLASS);
    if let Some(burger) = burger {
        doc[burger].remove_class(OPEN_CLASS);
    }
    true
}

pub fn is_open(doc: &Document, links: NodeId) -> bool {
    doc[links].has_class(OPEN_CLASS)
}
