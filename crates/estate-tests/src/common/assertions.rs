// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions

use axum::{
    http::{header, StatusCode},
    response::Response,
};
use estate_core::{MenuNode, MenuTree};

// =============================================================================
// Response Assertions
// =============================================================================

/// Assertion extensions for HTTP responses.
pub trait ResponseAssertions {
    /// Assert the status code.
    fn assert_status(&self, expected: StatusCode);

    /// Assert a `303 See Other` to `location`.
    fn assert_redirect_to(&self, location: &str);

    /// Assert there is no `Location` header.
    fn assert_no_redirect(&self);

    /// Returns every `Set-Cookie` header value.
    fn set_cookies(&self) -> Vec<String>;
}

impl ResponseAssertions for Response {
    fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status(),
            expected,
            "Expected status {}, got {}",
            expected,
            self.status()
        );
    }

    fn assert_redirect_to(&self, location: &str) {
        self.assert_status(StatusCode::SEE_OTHER);
        let actual = self
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok());
        assert_eq!(actual, Some(location), "Unexpected redirect target");
    }

    fn assert_no_redirect(&self) {
        assert!(
            self.headers().get(header::LOCATION).is_none(),
            "Expected no Location header, got {:?}",
            self.headers().get(header::LOCATION)
        );
    }

    fn set_cookies(&self) -> Vec<String> {
        self.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect()
    }
}

/// Reads a response body as JSON.
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Converts `Set-Cookie` values into a `Cookie` header, dropping removals.
pub fn cookie_header_from(set_cookies: &[String]) -> String {
    set_cookies
        .iter()
        .filter(|c| !c.contains("Max-Age=0"))
        .filter_map(|c| c.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Menu Assertions
// =============================================================================

/// Assertion extensions for composed menus.
pub trait MenuTreeAssertions {
    /// Assert the root labels, in order.
    fn assert_root_labels(&self, expected: &[&str]);

    /// Assert the child labels of node `id`, in order.
    fn assert_child_labels(&self, id: u64, expected: &[&str]);

    /// Assert the excluded identifiers, in any order.
    fn assert_excluded(&self, expected: &[u64]);
}

fn labels(nodes: &[MenuNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.label.as_str()).collect()
}

impl MenuTreeAssertions for MenuTree {
    fn assert_root_labels(&self, expected: &[&str]) {
        assert_eq!(labels(self.roots()), expected, "Unexpected root labels");
    }

    fn assert_child_labels(&self, id: u64, expected: &[&str]) {
        let node = self
            .find(id)
            .unwrap_or_else(|| panic!("Node {} is not in the tree", id));
        assert_eq!(labels(&node.children), expected, "Unexpected children of {}", id);
    }

    fn assert_excluded(&self, expected: &[u64]) {
        let mut actual = self.excluded().to_vec();
        let mut expected = expected.to_vec();
        actual.sort_unstable();
        expected.sort_unstable();
        assert_eq!(actual, expected, "Unexpected excluded records");
    }
}
