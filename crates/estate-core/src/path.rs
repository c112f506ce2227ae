// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route path handling.
//!
//! The role gate matches paths by exact string equality. Prefix matching
//! ([`is_active_prefix`]) exists only for highlighting the active menu
//! entry and must never be used for access decisions.

/// Normalizes a request path for permission lookup.
///
/// Drops the query string and fragment, and removes trailing slashes
/// except for the root path. No prefix or wildcard folding is applied.
///
/// ```
/// use estate_core::path::normalize;
///
/// assert_eq!(normalize("/admin/users/?page=2"), "/admin/users");
/// assert_eq!(normalize("/"), "/");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let trimmed = raw[..end].trim_end_matches('/');

    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Returns `true` if `raw` is already in normalized form.
pub fn is_normalized(raw: &str) -> bool {
    normalize(raw) == raw
}

/// Returns `true` if `item` should be highlighted while `current` is shown.
///
/// An item is active when it equals the current path or is a parent
/// segment of it. The root item is only active on the root path.
pub fn is_active_prefix(current: &str, item: &str) -> bool {
    let current = normalize(current);
    let item = normalize(item);

    if item == "/" {
        return current == "/";
    }
    current == item
        || current
            .strip_prefix(item.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
}

// =============================================================================
// Tests
// =============================================================================
