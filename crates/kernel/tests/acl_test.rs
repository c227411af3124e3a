#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Access control tests against the public API and the sample site.

use sitenav_kernel::AccessControlList;
use sitenav_kernel::acl::{AclError, Effect};
use sitenav_test_utils::sample_site;

const INVESTORS: &str = "page:company.investors";

fn chain_acl(resources: &[&str]) -> AccessControlList {
    let mut acl = AccessControlList::new();
    acl.add_role("guest", None).unwrap();
    acl.add_role("member", Some("guest")).unwrap();
    acl.add_role("admin", Some("member")).unwrap();
    for resource in resources {
        acl.add_resource(resource).unwrap();
    }
    acl
}

#[test]
fn test_default_deny_across_chain() {
    let acl = chain_acl(&["page:x", "page:y"]);
    for role in ["guest", "member", "admin"] {
        for privilege in [None, Some("view"), Some("edit")] {
            assert!(!acl.is_allowed(role, "page:x", privilege).unwrap());
        }
    }
}

#[test]
fn test_inherited_guest_allow() {
    let mut acl = chain_acl(&["page:x"]);
    acl.allow("guest", "page:x", None).unwrap();
    for role in ["member", "admin"] {
        for privilege in [None, Some("view"), Some("anything")] {
            assert!(acl.is_allowed(role, "page:x", privilege).unwrap());
        }
    }
}

#[test]
fn test_later_deny_on_nearer_role() {
    let mut acl = chain_acl(&["page:x"]);
    acl.allow("guest", "page:x", None).unwrap();
    acl.deny("member", "page:x", None).unwrap();

    assert!(acl.is_allowed("guest", "page:x", Some("view")).unwrap());
    assert!(!acl.is_allowed("member", "page:x", Some("view")).unwrap());
    assert!(!acl.is_allowed("admin", "page:x", Some("view")).unwrap());
}

#[test]
fn test_admin_own_rule_overrides_member_deny() {
    let mut acl = chain_acl(&["page:x"]);
    acl.deny("member", "page:x", None).unwrap();
    acl.allow("admin", "page:x", Some("edit")).unwrap();

    assert!(acl.is_allowed("admin", "page:x", Some("edit")).unwrap());
    // Admin has no view rule of its own, so member's deny decides.
    assert!(!acl.is_allowed("admin", "page:x", Some("view")).unwrap());
}

#[test]
fn test_sample_site_investors_scenario() {
    let site = sample_site();
    let acl = site.acl();

    assert!(!acl.is_allowed("guest", INVESTORS, Some("view")).unwrap());
    assert!(acl.is_allowed("member", INVESTORS, Some("view")).unwrap());
    assert!(acl.is_allowed("admin", INVESTORS, Some("view")).unwrap());
    assert!(!acl.is_allowed("member", INVESTORS, None).unwrap());
}

#[test]
fn test_sample_site_admin_and_public_pages() {
    let site = sample_site();
    let acl = site.acl();

    assert!(acl.is_allowed("admin", "page:admin", Some("access")).unwrap());
    assert!(!acl.is_allowed("member", "page:admin", Some("access")).unwrap());
    for role in ["guest", "member", "admin"] {
        assert!(acl.is_allowed(role, "page:products.software.enterprise", None).unwrap());
    }

    let decision = acl.evaluate("admin", "page:home", None).unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.rule.unwrap().role, "guest");
    assert_eq!(decision.rule.unwrap().effect, Effect::Allow);
}

#[test]
fn test_unknown_names_are_reported() {
    let site = sample_site();
    assert_eq!(
        site.acl().is_allowed("root", "page:home", None),
        Err(AclError::unknown_role("root"))
    );
    assert_eq!(
        site.acl().is_allowed("guest", "page:nowhere", None),
        Err(AclError::unknown_resource("page:nowhere"))
    );
}

#[test]
fn test_sample_site_role_inheritance_listing() {
    let site = sample_site();
    let roles = site.acl().roles();

    let listing: Vec<(&str, Option<&str>)> = roles
        .roles()
        .map(|role| (role, roles.parent_of(role).unwrap()))
        .collect();
    assert_eq!(
        listing,
        vec![
            ("guest", None),
            ("member", Some("guest")),
            ("admin", Some("member")),
        ]
    );
    let unknown = roles.parent_of("root");
    assert_eq!(unknown, Err(AclError::unknown_role("root")));
}
