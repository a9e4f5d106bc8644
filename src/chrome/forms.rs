//! Confirm-password validity and submit-button busy state.

use crate::dom::{Document, NodeId};

pub const MISMATCH_MESSAGE: &str = "Passwords do not match";
pub const PROCESSING_MARKUP: &str = r#"<i class="fas fa-spinner fa-spin"></i> Processing..."#;

/// Set or clear the mismatch message on the confirm field.
pub fn check_confirmation(doc: &mut Document, password: Option<NodeId>, confirm: NodeId) {
    let expected = password.map(|p| doc[p].value().to_string()).unwrap_or_default();
    let message = if doc[confirm].value() == expected {
        ""
    } else {
        MISMATCH_MESSAGE
    };
    doc[confirm].set_custom_validity(message);
}

/// Disable the form's submit button and show the processing label.
///
/// There is no way back; the page is expected to navigate away.
pub fn mark_submitting(doc: &mut Document, form: NodeId) -> Option<NodeId> {
    let button = doc.query_within(form, "button[type=\"submit\"]").ok()??;
    doc[button].set_disabled(true);
    doc[button].set_text("");
    doc[button].set_markup(PROCESSING_MARKUP);
    Some(button)
}
