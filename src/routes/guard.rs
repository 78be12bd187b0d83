//! Route guard.
//!
//! [`protect_routes`] decorates a route list in place: every route whose
//! handle asks for a login or names allowed roles gets its element wrapped
//! in a [`ProtectedElement`]. The wrapper renders a placeholder while the
//! auth state resolves, a redirect when access is denied, and the original
//! element otherwise.

use std::sync::Arc;

use tracing::{debug, info};

use crate::security::AccessProps;

use super::runtime::{Element, Navigate, RenderContext, Rendered, RouteObject};

/// Element shown only to users satisfying `access`.
#[derive(Debug)]
pub struct ProtectedElement {
    pub redirect_path: String,
    pub access: AccessProps,
    /// The element that was wrapped; `None` renders the outlet
    pub element: Option<Element>,
}

impl ProtectedElement {
    pub fn render(&self, ctx: &RenderContext<'_>, outlet: Option<Rendered>) -> Option<Rendered> {
        if ctx.auth.state().is_pending() {
            return Some(Rendered::Placeholder);
        }
        if !ctx.auth.has_access(&self.access) {
            debug!(
                location = %ctx.location,
                redirect = %self.redirect_path,
                "Access denied, redirecting"
            );
            return Some(Rendered::Redirect(Navigate {
                to: self.redirect_path.clone(),
                from: ctx.location.to_string(),
                replace: true,
            }));
        }
        match &self.element {
            Some(element) => element.render(ctx, outlet),
            None => outlet,
        }
    }
}

/// Wrap every protected route in `routes`, children included, root first.
///
/// Routes that are already wrapped are left alone, so calling this twice on
/// the same list is harmless.
pub fn protect_routes<'a>(
    routes: &'a mut [RouteObject],
    redirect_path: &str,
) -> &'a mut [RouteObject] {
    let protected = protect_all(routes, redirect_path);
    info!(protected, redirect_path = %redirect_path, "Route guard applied");
    routes
}

fn protect_all(routes: &mut [RouteObject], redirect_path: &str) -> usize {
    let mut protected = 0;
    for route in routes.iter_mut() {
        let access = route
            .handle
            .as_ref()
            .filter(|handle| handle.access.requires_auth())
            .map(|handle| handle.access.clone());
        let already_wrapped = route.element.as_ref().is_some_and(Element::is_protected);

        if let Some(access) = access {
            if !already_wrapped {
                debug!(path = %route.path, roles = ?access.roles_allowed, "Protecting route");
                route.element = Some(Element::Protected(Arc::new(ProtectedElement {
                    redirect_path: redirect_path.to_string(),
                    access,
                    element: route.element.take(),
                })));
                protected += 1;
            }
        }
        protected += protect_all(&mut route.children, redirect_path);
    }
    protected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{create_route, ModuleNamespace, RouteTable, ViewConfig};
    use crate::security::{AuthState, StaticAuth};
    use std::path::PathBuf;

    fn view(name: &str, roles: &[&str]) -> ModuleNamespace {
        ModuleNamespace {
            url: PathBuf::from(format!("{name}.tsx")),
            default_export: Some(name.to_string()),
            config: (!roles.is_empty()).then(|| ViewConfig {
                roles_allowed: roles.iter().map(|r| r.to_string()).collect(),
                ..ViewConfig::default()
            }),
        }
    }

    #[test]
    fn test_only_protected_route_changes() {
        let mut routes = vec![
            create_route("admin", Some(view("Admin", &["ADMIN"])), vec![]),
            create_route("public", Some(view("Public", &[])), vec![]),
        ];
        let before: Vec<Element> = routes.iter().map(|r| r.element.clone().unwrap()).collect();

        protect_routes(&mut routes, "/login");

        let admin = routes[0].element.as_ref().unwrap();
        assert!(admin.is_protected());
        assert!(!admin.ptr_eq(&before[0]));
        assert!(routes[1].element.as_ref().unwrap().ptr_eq(&before[1]));
    }

    #[test]
    fn test_nested_children_are_protected() {
        let mut routes = vec![create_route(
            "",
            None,
            vec![create_route(
                "settings",
                None,
                vec![create_route("users", Some(view("Users", &["ADMIN"])), vec![])],
            )],
        )];
        protect_routes(&mut routes, "/login");
        let users = &routes[0].children[0].children[0];
        assert!(users.element.as_ref().unwrap().is_protected());
    }

    #[test]
    fn test_second_call_does_not_double_wrap() {
        let mut routes = vec![create_route("admin", Some(view("Admin", &["ADMIN"])), vec![])];
        protect_routes(&mut routes, "/login");
        let first = routes[0].element.clone().unwrap();
        protect_routes(&mut routes, "/login");
        assert!(routes[0].element.as_ref().unwrap().ptr_eq(&first));
    }

    #[test]
    fn test_render_outcomes() {
        let mut routes = vec![create_route("admin", Some(view("Admin", &["ADMIN"])), vec![])];
        protect_routes(&mut routes, "/login");
        let table = RouteTable::new(routes).unwrap();

        assert_eq!(
            table.render("/admin", &StaticAuth::loading()),
            Some(Rendered::Placeholder)
        );
        assert_eq!(
            table.render("/admin", &StaticAuth::user("bob", ["USER"])),
            Some(Rendered::Redirect(Navigate {
                to: "/login".into(),
                from: "/admin".into(),
                replace: true,
            }))
        );
        assert!(matches!(
            table.render("/admin", &StaticAuth::new(AuthState::Failed("boom".into()))),
            Some(Rendered::Redirect(_))
        ));
        let granted = table.render("/admin", &StaticAuth::user("ada", ["ADMIN"])).unwrap();
        assert_eq!(granted.component_names(), vec!["Admin"]);
    }
}
