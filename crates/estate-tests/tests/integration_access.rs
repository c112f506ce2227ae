// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Access Control Integration Tests
//!
//! - `test_evaluator_*`: access evaluator over the packaged table
//! - `test_guard_*`: both gates composed
//! - `test_catalog_*`: route catalog coverage

use estate_core::{
    AccessDecision, AuthGate, DenyReason, GrantReason, GuardOutcome, KnownRole, PermissionTable,
    Role, RoleGate, RouteCatalog, RouteGuard, SessionState,
};
use estate_tests::prelude::*;

fn role(label: &str) -> Role {
    Role::new(label).unwrap()
}

fn guard() -> RouteGuard {
    RouteGuard::new(
        AuthGate::default(),
        RoleGate::new(TableFixtures::packaged_evaluator()),
    )
}

// =============================================================================
// Access Evaluator
// =============================================================================

#[test]
fn test_evaluator_admin_only_page() {
    let evaluator = TableFixtures::packaged_evaluator();

    assert!(evaluator.has_access(Some(&role("admin")), "/admin/role-permissions"));
    assert!(!evaluator.has_access(Some(&role("manager")), "/admin/role-permissions"));
    assert!(!evaluator.has_access(Some(&role("user")), "/admin/role-permissions"));
}

#[test]
fn test_evaluator_role_case_is_ignored() {
    let evaluator = TableFixtures::packaged_evaluator();

    for label in ["Manager", "MANAGER", "manager"] {
        assert!(
            evaluator.has_access(Some(&role(label)), "/properties"),
            "{} should enter /properties",
            label
        );
    }
}

#[test]
fn test_evaluator_padded_role_does_not_match() {
    let evaluator = TableFixtures::packaged_evaluator();

    for label in [" admin", "admin ", "\tadmin"] {
        assert!(
            !evaluator.has_access(Some(&role(label)), "/admin/role-permissions"),
            "{:?} should not enter /admin/role-permissions",
            label
        );
    }
    assert!(evaluator.has_access(Some(&role(" admin")), "/community"));
}

#[test]
fn test_evaluator_unmapped_path_is_open_to_any_role() {
    let evaluator = TableFixtures::packaged_evaluator();

    assert_eq!(
        evaluator.decide(Some(&role("user")), "/community"),
        AccessDecision::Granted(GrantReason::Unmapped)
    );
    assert!(evaluator.has_access(Some(&role("janitor")), "/dashboard"));
}

#[test]
fn test_evaluator_no_identity_is_denied_everywhere() {
    let evaluator = TableFixtures::packaged_evaluator();

    for path in ["/community", "/properties", "/admin/menus", "/"] {
        assert_eq!(
            evaluator.decide(None, path),
            AccessDecision::Denied(DenyReason::NoIdentity)
        );
    }
}

#[test]
fn test_evaluator_exact_match_only() {
    let evaluator = TableFixtures::packaged_evaluator();
    let user = role("user");

    // Sub-paths are separate keys and inherit nothing.
    assert!(evaluator.decide(Some(&user), "/admin/users/42").is_fail_open());
    // Normalization removes the trailing slash and query before lookup.
    assert!(!evaluator.has_access(Some(&user), "/admin/users/"));
    assert!(!evaluator.has_access(Some(&user), "/admin/users?tab=roles"));
}

#[test]
fn test_evaluator_decide_agrees_with_has_access() {
    let evaluator = TableFixtures::packaged_evaluator();
    let catalog = RouteCatalog::console();
    let mut roles: Vec<Option<Role>> =
        KnownRole::all().iter().map(|r| Some(Role::from(*r))).collect();
    roles.push(Some(role("auditor")));
    roles.push(None);

    for route in catalog.routes() {
        for role in &roles {
            let decision = evaluator.decide(role.as_ref(), &route.path);
            assert_eq!(decision.is_granted(), evaluator.has_access(role.as_ref(), &route.path));
            assert_eq!(
                evaluator.can_enter_route(role.as_ref(), &route.path),
                decision.is_granted()
            );
        }
    }
}

#[test]
fn test_evaluator_uppercase_table_entry_never_matches() {
    let table = PermissionTable::builder().allow("/reports", ["Admin"]).build();
    let evaluator = estate_core::AccessEvaluator::new(std::sync::Arc::new(table.clone()));

    assert!(!evaluator.has_access(Some(&role("admin")), "/reports"));
    assert!(!evaluator.has_access(Some(&role("Admin")), "/reports"));
    assert_eq!(table.lint().len(), 1);
}

// =============================================================================
// Route Guard
// =============================================================================

#[test]
fn test_guard_loading_shows_indicator() {
    assert_eq!(guard().evaluate(&SessionState::Loading, "/properties"), GuardOutcome::Loading);
}

#[test]
fn test_guard_no_session_redirects_to_login() {
    assert_eq!(
        guard().evaluate(&SessionState::Unauthenticated, "/admin/menus"),
        GuardOutcome::Redirect { location: "/login" }
    );
}

#[test]
fn test_guard_denied_role_keeps_path() {
    let state = SessionState::Authenticated(SessionBuilder::manager().build());

    assert_eq!(
        guard().evaluate(&state, "/admin/role-permissions"),
        GuardOutcome::AccessDenied {
            path: "/admin/role-permissions".to_string(),
            role: role("manager"),
        }
    );
}

#[test]
fn test_guard_renders_allowed_page() {
    let session = SessionBuilder::admin().build();
    let state = SessionState::Authenticated(session.clone());

    assert_eq!(guard().evaluate(&state, "/admin/role-permissions"), GuardOutcome::Render(&session));
}

// =============================================================================
// Route Catalog
// =============================================================================

#[test]
fn test_catalog_packaged_table_covers_restricted_pages() {
    let report = RouteCatalog::console().coverage(&TableFixtures::packaged());

    assert!(report.is_ok(), "unmapped restricted pages: {:?}", report.unmapped_restricted);
    assert_eq!(report.fail_open, vec!["/dashboard", "/community", "/profile"]);
}

#[test]
fn test_catalog_missing_entry_fails_loudly() {
    let report = RouteCatalog::console().coverage(&TableFixtures::small());
    let err = report.into_result().unwrap_err();

    assert!(err.to_string().contains("/units"));
}
