//! Deduplicated warnings for recoverable input problems.
//!
//! Malformed markup, unknown CSS properties and unsupported display types
//! are reported once per unique message instead of once per occurrence.
//! Messages go through [`log::warn!`] with the component as the target, so
//! `RUST_LOG=wren::css=warn` style filtering works out of the box.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings already emitted since the last [`clear_warnings`].
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (logged once per unique message).
///
/// # Example
/// ```
/// wren_common::warning::warn_once("CSS", "unsupported unit 'ex' in width: 2ex");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time {
        log::warn!(target: "wren", "[{component}] {message}");
    }
}

/// Returns true if this exact warning was already emitted.
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call when loading a new page).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
