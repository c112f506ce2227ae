// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Sidebar navigation.
//!
//! The backend delivers a flat list of [`MenuRecord`]s with per-item
//! accessibility flags. [`NavigationComposer`] turns that list into a
//! [`MenuTree`]. Inaccessible items stay in the tree, annotated, so the
//! console can show them disabled.
//!
//! Menu visibility here is independent of route entry. A route may be
//! enterable while its menu item is disabled, and the reverse.

mod composer;
mod record;

pub use composer::{can_see_menu_item, MenuNode, MenuState, MenuTree, NavigationComposer, MAX_MENU_DEPTH};
pub use record::{MenuPayload, MenuRecord};
