// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session storage backends.

use std::collections::HashMap;

// =============================================================================
// SessionStorage Trait
// =============================================================================

/// Durable string key/value storage for session entries.
///
/// Implementations must apply [`SessionStorage::set_all`] in one
/// synchronous step so that a reader never observes one entry without the
/// other.
pub trait SessionStorage {
    /// Reads an entry.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes an entry.
    fn set(&mut self, key: &str, value: &str);

    /// Removes an entry. Removing a missing entry is a no-op.
    fn remove(&mut self, key: &str);

    /// Writes several entries together.
    fn set_all(&mut self, entries: &[(&str, &str)]) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process storage, used by tests and by command-line tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
