use super::*;
use crate::user::User;
use time::OffsetDateTime;

fn session_as(role: Role) -> Session {
    Session::logged_in(User {
        id: "1".into(),
        name: "Test".into(),
        email: "test@electron.com".into(),
        role,
        created_at: OffsetDateTime::UNIX_EPOCH,
    })
}

// =============================================================================
// SessionView
// =============================================================================

#[test]
fn session_is_its_own_view() {
    let session = session_as(Role::Admin);
    assert!(SessionView::is_logged_in(&session));
    assert!(SessionView::has_role(&session, [Role::Admin]));
}

// =============================================================================
// RoleGuard::allows
// =============================================================================

#[test]
fn admin_only_allows_admin() {
    let guard = RoleGuard::admin_only();
    assert!(guard.allows(&session_as(Role::Admin)));
    assert!(!guard.allows(&session_as(Role::Viewer)));
}

#[test]
fn multi_role_guard_allows_any_listed_role() {
    let guard = RoleGuard::new([Role::Admin, Role::Viewer]);
    assert!(guard.allows(&session_as(Role::Viewer)));
    assert!(guard.allows(&session_as(Role::Admin)));
}

#[test]
fn empty_guard_allows_nobody() {
    let guard = RoleGuard::new(Vec::<Role>::new());
    assert!(!guard.allows(&session_as(Role::Admin)));
}

#[test]
fn logged_out_is_never_allowed() {
    let guard = RoleGuard::new([Role::Admin, Role::Viewer]);
    assert!(!guard.allows(&Session::logged_out()));
}

// =============================================================================
// RoleGuard::render
// =============================================================================

#[test]
fn render_picks_content_when_allowed() {
    let guard = RoleGuard::admin_only();
    let out = guard.render(&session_as(Role::Admin), || "dashboard", || "denied");
    assert_eq!(out, "dashboard");
}

#[test]
fn render_picks_fallback_when_denied() {
    let guard = RoleGuard::admin_only();
    assert_eq!(guard.render(&session_as(Role::Viewer), || "dashboard", || "denied"), "denied");
    assert_eq!(guard.render(&Session::logged_out(), || "dashboard", || "denied"), "denied");
}

#[test]
fn render_only_runs_chosen_branch() {
    let guard = RoleGuard::admin_only();
    let out = guard.render(&Session::logged_out(), || panic!("content must not run"), || 0);
    assert_eq!(out, 0);
}
