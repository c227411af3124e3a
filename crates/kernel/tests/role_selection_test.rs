#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Viewer role selection through the sample site.

use sitenav_kernel::menu::ActiveRoute;
use sitenav_kernel::role::{RoleSelectorError, SESSION_USER_ROLE};
use sitenav_kernel::{RoleSelector, RoleSession};
use sitenav_test_utils::{TestSession, sample_site};

#[test]
fn test_sample_selector_allow_list() {
    let site = sample_site();
    let selector = site.selector();

    assert_eq!(selector.default_role(), "guest");
    assert_eq!(selector.allowed_roles(), ["guest", "member", "admin"]);
    assert_eq!(selector.session_key(), SESSION_USER_ROLE);
}

#[test]
fn test_fresh_session_gets_default_without_write() {
    let site = sample_site();
    let mut session = TestSession::new();

    assert_eq!(site.select_role(None, &mut session), "guest");
    assert_eq!(session.write_count(), 0);
    assert_eq!(session.get(SESSION_USER_ROLE), None);
}

#[test]
fn test_valid_override_is_persisted() {
    let site = sample_site();
    let mut session = TestSession::new();

    assert_eq!(site.select_role(Some("admin"), &mut session), "admin");
    assert_eq!(session.write_count(), 1);
    assert_eq!(session.get(SESSION_USER_ROLE).as_deref(), Some("admin"));

    // Later requests without an override keep the stored role.
    assert_eq!(site.select_role(None, &mut session), "admin");
    assert_eq!(session.write_count(), 1);
}

#[test]
fn test_invalid_override_falls_back_to_session() {
    let site = sample_site();
    let mut session = TestSession::with(SESSION_USER_ROLE, "member");

    assert_eq!(site.select_role(Some("superuser"), &mut session), "member");
    assert_eq!(session.write_count(), 0);
}

#[test]
fn test_corrupted_session_value_is_reset() {
    let site = sample_site();
    let mut session = TestSession::with(SESSION_USER_ROLE, "root");

    assert_eq!(site.select_role(Some("superuser"), &mut session), "guest");
    assert_eq!(session.write_count(), 1);
    assert_eq!(
        session.writes,
        vec![(SESSION_USER_ROLE.to_string(), "guest".to_string())]
    );
}

#[test]
fn test_custom_session_key() {
    let site = sample_site().with_session_key("viewer");
    let mut session = TestSession::new();

    assert_eq!(site.select_role(Some("member"), &mut session), "member");
    assert_eq!(session.get("viewer").as_deref(), Some("member"));
    assert_eq!(session.get(SESSION_USER_ROLE), None);
}

#[test]
fn test_selected_role_drives_rendering() {
    let site = sample_site();
    let mut session = TestSession::new();
    let route = ActiveRoute::named("company.investors");

    let role = site.select_role(None, &mut session);
    assert!(!site.authorize(&role, &route).is_granted());

    let role = site.select_role(Some("member"), &mut session);
    assert!(site.authorize(&role, &route).is_granted());
    let view = site.render(&role, &route);
    assert_eq!(view.role, "member");
}

#[test]
fn test_selector_construction_errors() {
    assert_eq!(
        RoleSelector::new(Vec::<String>::new(), "guest"),
        Err(RoleSelectorError::NoRoles)
    );
    assert_eq!(
        RoleSelector::new(["guest", "member"], "admin"),
        Err(RoleSelectorError::DefaultNotAllowed {
            role: "admin".to_string()
        })
    );
}
