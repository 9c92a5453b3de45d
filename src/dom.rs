//! DOM helpers for `<select>` population and child-node clearing.
//!
//! Thin, stateless wrappers around document mutation. Every helper
//! operates on a caller-supplied element; none of them touches global
//! state or outlives its call.

use wasm_bindgen::JsCast;
use web_sys::{HtmlOptionElement, HtmlSelectElement, Node};

use crate::error::DomError;

/// Attributes for an option appended with [`append_option`].
#[derive(Debug, Clone, Default)]
pub struct OptionAttrs {
    /// Whether the new option is marked selected.
    pub selected: bool,
    /// Display text; defaults to the option value when `None`.
    pub text: Option<String>,
}

/// Remove every child node from `parent`.
///
/// A parent with no children is a no-op, which also makes the call
/// idempotent.
pub fn clear_child_nodes(parent: &Node) {
    while let Some(child) = parent.first_child() {
        if parent.remove_child(&child).is_err() {
            break;
        }
    }
}

/// Append one `<option>` to `select`.
///
/// The display text falls back to `value` when [`OptionAttrs::text`] is
/// unset; the new option becomes the last child of the select element.
pub fn append_option(
    select: &HtmlSelectElement,
    value: &str,
    attrs: OptionAttrs,
) -> Result<(), DomError> {
    let text = attrs.text.as_deref().unwrap_or(value);
    let option = HtmlOptionElement::new_with_text_and_value(text, value)
        .map_err(|_| DomError::OptionCreationFailed)?;
    option.set_selected(attrs.selected);
    select
        .append_child(&option)
        .map_err(|_| DomError::AppendFailed)?;
    Ok(())
}

/// Select the first option of `select` whose value equals `value`.
///
/// Scans the options in document order and stops at the first match;
/// when nothing matches, the selection is left untouched.
pub fn select_value(select: &HtmlSelectElement, value: &str) {
    let options = select.options();
    for index in 0..options.length() {
        let Some(element) = options.item(index) else {
            continue;
        };
        let Ok(option) = element.dyn_into::<HtmlOptionElement>() else {
            continue;
        };
        if option.value() == value {
            option.set_selected(true);
            return;
        }
    }
}
