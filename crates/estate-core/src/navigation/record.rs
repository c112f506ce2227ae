// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Menu wire format.

use serde::{Deserialize, Serialize};

use crate::error::MenuError;

// =============================================================================
// MenuRecord
// =============================================================================

/// One flat menu entry as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuRecord {
    /// Numeric identifier, unique within a response.
    pub id: u64,
    /// Parent identifier. `None` makes this a root.
    #[serde(default)]
    pub parent_id: Option<u64>,
    /// Display label.
    pub label: String,
    /// Route path.
    pub path: String,
    /// Icon key for the renderer.
    #[serde(default, alias = "iconKey", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether the signed-in user may use this item.
    pub is_accessible: bool,
}

impl MenuRecord {
    /// Creates an accessible root record.
    pub fn root(id: u64, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: None,
            label: label.into(),
            path: path.into(),
            icon: None,
            is_accessible: true,
        }
    }

    /// Creates an accessible child record.
    pub fn child(id: u64, parent_id: u64, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::root(id, label, path)
        }
    }

    /// Sets the icon key.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the accessibility flag.
    pub fn accessible(mut self, is_accessible: bool) -> Self {
        self.is_accessible = is_accessible;
        self
    }
}

// =============================================================================
// MenuPayload
// =============================================================================

/// Envelope of the menu endpoint: `{ "success": bool, "data": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuPayload {
    /// Whether the backend produced the menu.
    pub success: bool,
    /// The flat record list.
    #[serde(default)]
    pub data: Option<Vec<MenuRecord>>,
}

impl MenuPayload {
    /// Wraps records in a successful envelope.
    pub fn ok(records: Vec<MenuRecord>) -> Self {
        Self {
            success: true,
            data: Some(records),
        }
    }

    /// Parses a response body and extracts its records.
    pub fn parse(body: &str) -> Result<Vec<MenuRecord>, MenuError> {
        let payload: MenuPayload =
            serde_json::from_str(body).map_err(|e| MenuError::malformed(e.to_string()))?;
        payload.into_records()
    }

    /// Interprets an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Vec<MenuRecord>, MenuError> {
        let payload: MenuPayload =
            serde_json::from_value(value).map_err(|e| MenuError::malformed(e.to_string()))?;
        payload.into_records()
    }

    /// Returns the records of a successful envelope.
    pub fn into_records(self) -> Result<Vec<MenuRecord>, MenuError> {
        if !self.success {
            return Err(MenuError::Rejected);
        }
        self.data
            .ok_or_else(|| MenuError::malformed("missing data array"))
    }
}

// =============================================================================
// Tests
// =============================================================================
