#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use clientgen::config::GeneratorConfig;
use clientgen::routes::{
    build_route_objects, collect_routes, protect_routes, FsModuleLoader, Navigate, Rendered,
    RouteTable,
};
use clientgen::security::{AuthState, StaticAuth};
use common::fixtures::{protected_view_source, view_source, write_views};
use std::path::Path;

fn guarded_table(dir: &Path) -> RouteTable {
    let views = write_views(
        dir,
        &[
            ("@layout.tsx", view_source("MainLayout").as_str()),
            ("@index.tsx", view_source("Home").as_str()),
            ("admin.tsx", protected_view_source("Admin", &["ADMIN"]).as_str()),
            (
                "account.tsx",
                "export const config = { loginRequired: true };\nexport default function Account() {}\n",
            ),
            ("users/[id].tsx", view_source("UserDetail").as_str()),
        ],
    );
    let config = GeneratorConfig::default();
    let tree = collect_routes(&views, &config).unwrap();
    let mut routes = vec![build_route_objects(&tree, &FsModuleLoader).unwrap()];
    protect_routes(&mut routes, &config.redirect_path);
    RouteTable::new(routes).unwrap()
}

fn outlet_of(rendered: &Rendered) -> Option<&Rendered> {
    match rendered {
        Rendered::Component { outlet, .. } => outlet.as_deref(),
        _ => None,
    }
}

#[test]
fn test_public_routes_render_inside_layout() {
    let dir = tempfile::tempdir().unwrap();
    let table = guarded_table(dir.path());
    let anonymous = StaticAuth::anonymous();

    let home = table.render("/", &anonymous).unwrap();
    assert_eq!(home.component_names(), vec!["MainLayout", "Home"]);

    let matched = table.match_path("/users/42").unwrap();
    assert_eq!(matched.pattern, "/users/:id");
    assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));
    let user = table.render("/users/42/", &anonymous).unwrap();
    assert_eq!(user.component_names(), vec!["MainLayout", "UserDetail"]);
}

#[test]
fn test_denied_route_redirects_inside_layout() {
    let dir = tempfile::tempdir().unwrap();
    let table = guarded_table(dir.path());

    for auth in [
        StaticAuth::anonymous(),
        StaticAuth::user("bob", ["USER"]),
        StaticAuth::new(AuthState::Failed("network".into())),
    ] {
        let rendered = table.render("/admin", &auth).unwrap();
        assert_eq!(rendered.component_names(), vec!["MainLayout"]);
        assert_eq!(
            outlet_of(&rendered),
            Some(&Rendered::Redirect(Navigate {
                to: "/login".into(),
                from: "/admin".into(),
                replace: true,
            }))
        );
    }
}

#[test]
fn test_pending_auth_renders_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let table = guarded_table(dir.path());

    for auth in [StaticAuth::loading(), StaticAuth::new(AuthState::Initializing)] {
        let rendered = table.render("/admin", &auth).unwrap();
        assert_eq!(outlet_of(&rendered), Some(&Rendered::Placeholder));
    }
}

#[test]
fn test_granted_routes_render_view() {
    let dir = tempfile::tempdir().unwrap();
    let table = guarded_table(dir.path());

    let admin = table.render("/admin", &StaticAuth::user("ada", ["ADMIN"])).unwrap();
    assert_eq!(admin.component_names(), vec!["MainLayout", "Admin"]);

    // login without roles admits any signed-in user
    let account = table.render("/account", &StaticAuth::user("bob", ["USER"])).unwrap();
    assert_eq!(account.component_names(), vec!["MainLayout", "Account"]);
    let denied = table.render("/account", &StaticAuth::anonymous()).unwrap();
    assert!(matches!(outlet_of(&denied), Some(Rendered::Redirect(_))));
}

#[test]
fn test_only_protected_routes_are_wrapped() {
    let dir = tempfile::tempdir().unwrap();
    let table = guarded_table(dir.path());

    let root = &table.routes()[0];
    assert!(!root.element.as_ref().unwrap().is_protected());
    let by_path = |path: &str| {
        root.children
            .iter()
            .find(|r| r.path == path)
            .and_then(|r| r.element.as_ref())
            .map(|e| e.is_protected())
    };
    assert_eq!(by_path(""), Some(false));
    assert_eq!(by_path("admin"), Some(true));
    assert_eq!(by_path("account"), Some(true));
    assert_eq!(by_path("users"), None);
}

#[test]
fn test_unknown_location() {
    let dir = tempfile::tempdir().unwrap();
    let table = guarded_table(dir.path());
    assert!(table.match_path("/nowhere/at/all").is_none());
    assert!(table.render("/nowhere/at/all", &StaticAuth::anonymous()).is_none());
}
