// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Menu tree composition.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::record::{MenuPayload, MenuRecord};
use crate::error::MenuError;

/// Deepest menu the composer accepts. Deeper trees are malformed.
pub const MAX_MENU_DEPTH: usize = 64;

// =============================================================================
// MenuNode
// =============================================================================

/// A node of the composed menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    /// Record identifier.
    pub id: u64,
    /// Display label.
    pub label: String,
    /// Route path.
    pub path: String,
    /// Icon key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Backend accessibility flag.
    pub is_accessible: bool,
    /// Children in backend order.
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    fn from_record(record: &MenuRecord) -> Self {
        Self {
            id: record.id,
            label: record.label.clone(),
            path: record.path.clone(),
            icon: record.icon.clone(),
            is_accessible: record.is_accessible,
            children: Vec::new(),
        }
    }

    /// Returns `true` if the item should be rendered disabled.
    pub fn disabled(&self) -> bool {
        !can_see_menu_item(self)
    }

    /// Counts this node and all descendants.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(MenuNode::count).sum::<usize>()
    }

    fn find(&self, id: u64) -> Option<&MenuNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Menu visibility capability.
///
/// Driven only by the backend flag. It does not consult the permission
/// table and may disagree with [`crate::AccessEvaluator::can_enter_route`].
pub fn can_see_menu_item(node: &MenuNode) -> bool {
    node.is_accessible
}

// =============================================================================
// MenuTree
// =============================================================================

/// The composed menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuTree {
    roots: Vec<MenuNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    excluded: Vec<u64>,
}

impl MenuTree {
    /// Returns an empty tree.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Root nodes in backend order. Each root is one navigation group.
    pub fn roots(&self) -> &[MenuNode] {
        &self.roots
    }

    /// Identifiers of records left out because their parent chain does not
    /// reach a root.
    pub fn excluded(&self) -> &[u64] {
        &self.excluded
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Counts all nodes.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(MenuNode::count).sum()
    }

    /// Finds a node by identifier.
    pub fn find(&self, id: u64) -> Option<&MenuNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Consumes the tree, returning its roots.
    pub fn into_roots(self) -> Vec<MenuNode> {
        self.roots
    }
}

// =============================================================================
// MenuState
// =============================================================================

/// What the navigation area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    /// The menu was composed.
    Ready(MenuTree),
    /// The menu is unavailable; an empty menu and this message are shown.
    Failed {
        /// Message for the navigation area.
        message: String,
    },
}

impl MenuState {
    /// Builds the failed state for `error`.
    pub fn failed(error: &MenuError) -> Self {
        MenuState::Failed {
            message: error.user_message(),
        }
    }

    /// Returns the tree to render. Empty when failed.
    pub fn roots(&self) -> &[MenuNode] {
        match self {
            MenuState::Ready(tree) => tree.roots(),
            MenuState::Failed { .. } => &[],
        }
    }

    /// Returns the error message, if failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            MenuState::Ready(_) => None,
            MenuState::Failed { message } => Some(message),
        }
    }

    /// Returns `true` if the menu was composed.
    pub fn is_ready(&self) -> bool {
        matches!(self, MenuState::Ready(_))
    }
}

impl From<Result<MenuTree, MenuError>> for MenuState {
    fn from(result: Result<MenuTree, MenuError>) -> Self {
        match result {
            Ok(tree) => MenuState::Ready(tree),
            Err(e) => {
                warn!(error = %e, "Navigation menu unavailable");
                MenuState::failed(&e)
            }
        }
    }
}

// =============================================================================
// NavigationComposer
// =============================================================================

/// Turns flat menu records into a rooted tree.
///
/// 1. Every record is indexed by identifier. Duplicate identifiers make the
///    whole response malformed.
/// 2. Each record with a parent is attached under that parent, in backend
///    order.
/// 3. Records without a parent are roots, in backend order.
/// 4. Records whose parent chain never reaches a root (missing parent,
///    self-parent, cycles) are left out and reported in
///    [`MenuTree::excluded`].
/// 5. A tree nested deeper than [`MAX_MENU_DEPTH`] makes the response
///    malformed.
///
/// Inaccessible records are kept and annotated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationComposer;

impl NavigationComposer {
    /// Composes `records` into a tree.
    pub fn compose(records: &[MenuRecord]) -> Result<MenuTree, MenuError> {
        let mut index: HashMap<u64, usize> = HashMap::with_capacity(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.id, pos).is_some() {
                return Err(MenuError::DuplicateId { id: record.id });
            }
        }

        let mut children: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (pos, record) in records.iter().enumerate() {
            match record.parent_id {
                None => roots.push(pos),
                Some(parent) if index.contains_key(&parent) => {
                    children.entry(parent).or_default().push(pos)
                }
                Some(parent) => {
                    debug!(id = record.id, parent = parent, "Menu record references unknown parent");
                }
            }
        }

        let mut placed = vec![false; records.len()];
        let roots = build_forest(records, &children, &roots, &mut placed)?;

        let excluded: Vec<u64> = records
            .iter()
            .zip(&placed)
            .filter(|(_, placed)| !**placed)
            .map(|(record, _)| record.id)
            .collect();

        if !excluded.is_empty() {
            debug!(count = excluded.len(), ids = ?excluded, "Menu records excluded from tree");
        }

        Ok(MenuTree { roots, excluded })
    }

    /// Parses a menu response body and composes it.
    ///
    /// Any failure yields [`MenuState::Failed`] with an empty menu.
    pub fn from_body(body: &str) -> MenuState {
        MenuPayload::parse(body)
            .and_then(|records| Self::compose(&records))
            .into()
    }

    /// Composes an already-decoded response.
    pub fn from_value(value: serde_json::Value) -> MenuState {
        MenuPayload::from_value(value)
            .and_then(|records| Self::compose(&records))
            .into()
    }
}

/// A node whose children are still being built.
struct Frame<'a> {
    node: MenuNode,
    pending: std::slice::Iter<'a, usize>,
}

impl<'a> Frame<'a> {
    fn open(
        records: &[MenuRecord],
        children: &'a HashMap<u64, Vec<usize>>,
        pos: usize,
        placed: &mut [bool],
    ) -> Self {
        placed[pos] = true;
        let record = &records[pos];
        Self {
            node: MenuNode::from_record(record),
            pending: children.get(&record.id).map_or(&[][..], Vec::as_slice).iter(),
        }
    }
}

/// Builds the subtrees under `roots` with an explicit stack.
///
/// Every record has at most one parent, so the nodes reachable from the
/// roots form a forest and each record is visited at most once. A node is
/// attached to its parent only after all of its own children are.
fn build_forest(
    records: &[MenuRecord],
    children: &HashMap<u64, Vec<usize>>,
    roots: &[usize],
    placed: &mut [bool],
) -> Result<Vec<MenuNode>, MenuError> {
    let mut forest = Vec::with_capacity(roots.len());

    for &root in roots {
        let mut stack = vec![Frame::open(records, children, root, placed)];

        while let Some(frame) = stack.last_mut() {
            if let Some(&child) = frame.pending.next() {
                if stack.len() >= MAX_MENU_DEPTH {
                    warn!(root = records[root].id, limit = MAX_MENU_DEPTH, "Menu nested too deeply");
                    return Err(MenuError::malformed(format!(
                        "menu is nested deeper than {} levels",
                        MAX_MENU_DEPTH
                    )));
                }
                stack.push(Frame::open(records, children, child, placed));
            } else if let Some(done) = stack.pop() {
                match stack.last_mut() {
                    Some(parent) => parent.node.children.push(done.node),
                    None => forest.push(done.node),
                }
            }
        }
    }

    Ok(forest)
}

// =============================================================================
// Tests
// =============================================================================
