use conclave_auth::{RoleProvider, StaticRoleProvider};
use conclave_config::RoleConfig;
use conclave_models::{PermissionSet, Role, permissions_for};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;

const ADMINS: [&str; 2] = ["chair@org.example", "vice.chair@org.example"];
const BOARD: [&str; 3] = [
    "treasurer@org.example",
    "secretary@org.example",
    "member.at.large@org.example",
];
const ADVISORY: [&str; 2] = ["mentor@org.example", "past.chair@org.example"];

fn provider() -> StaticRoleProvider {
    StaticRoleProvider::new(&RoleConfig::new(
        ADMINS.to_vec(),
        BOARD.to_vec(),
        ADVISORY.to_vec(),
    ))
}

#[test]
fn test_every_listed_email_resolves_to_its_role() {
    let roles = provider();

    for email in ADMINS {
        assert_eq!(roles.resolve(email), Role::Admin, "{email}");
    }
    for email in BOARD {
        assert_eq!(roles.resolve(email), Role::Board, "{email}");
    }
    for email in ADVISORY {
        assert_eq!(roles.resolve(email), Role::Advisory, "{email}");
    }
}

#[test]
fn test_unlisted_emails_are_viewers() {
    let roles = provider();

    for _ in 0..200 {
        let email: String = SafeEmail().fake();
        assert_eq!(roles.resolve(&email), Role::Viewer, "{email}");
    }
}

#[test]
fn test_resolution_ignores_case_and_whitespace() {
    let roles = provider();
    assert_eq!(roles.resolve("\tSECRETARY@org.EXAMPLE  "), Role::Board);
}

#[test]
fn test_from_env_style_lists() {
    let roles: StaticRoleProvider = RoleConfig::new(
        vec!["A@Org.Example", " "],
        vec!["b@org.example"],
        vec![],
    )
    .into();

    assert_eq!(roles.resolve("a@org.example"), Role::Admin);
    assert_eq!(roles.resolve("b@org.example"), Role::Board);
    assert_eq!(roles.resolve(" "), Role::Viewer);
}

#[test]
fn test_viewer_has_no_permissions() {
    assert_eq!(permissions_for(Role::Viewer), PermissionSet::NONE);
    assert!(permissions_for(Role::Viewer).granted().is_empty());
}

#[test]
fn test_admin_has_every_permission() {
    assert_eq!(permissions_for(Role::Admin), PermissionSet::ALL);
}

#[test]
fn test_permissions_shrink_down_the_hierarchy() {
    let admin = permissions_for(Role::Admin).granted();
    let board = permissions_for(Role::Board).granted();
    let advisory = permissions_for(Role::Advisory).granted();

    assert!(board.iter().all(|p| admin.contains(p)));
    assert!(advisory.iter().all(|p| board.contains(p)));
    assert!(admin.len() > board.len());
    assert!(board.len() > advisory.len());
}

#[test]
fn test_only_non_viewers_hold_sessions() {
    assert!(Role::Admin.can_hold_session());
    assert!(Role::Board.can_hold_session());
    assert!(Role::Advisory.can_hold_session());
    assert!(!Role::Viewer.can_hold_session());
}
