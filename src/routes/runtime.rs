//! Runtime route objects, matching and rendering.
//!
//! A [`RouteObject`] is what `createRoute` produces in the generated route
//! module: a path pattern segment, the loaded view module, the element it
//! renders and the handle carrying the view config. [`RouteTable`]
//! compiles a route list into anchored regexes and resolves a location to
//! the chain of routes from the root to the matched leaf; rendering that
//! chain nests each child inside its parent's outlet.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::security::{AccessProps, AuthProvider};

use super::collect::RouteMeta;
use super::guard::ProtectedElement;
use super::module::{ModuleLoader, ModuleNamespace};
use super::segment::{join_pattern, pattern_to_regex, to_url_pattern};

/// A view component, identified by its export name and module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub module: PathBuf,
}

/// What a route renders.
#[derive(Debug, Clone)]
pub enum Element {
    Component(Arc<Component>),
    /// Rendered only when the access check passes
    Protected(Arc<ProtectedElement>),
}

impl Element {
    pub fn is_protected(&self) -> bool {
        matches!(self, Element::Protected(_))
    }

    /// Whether both values are the same element, not merely equal ones.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        match (self, other) {
            (Element::Component(a), Element::Component(b)) => Arc::ptr_eq(a, b),
            (Element::Protected(a), Element::Protected(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn render(&self, ctx: &RenderContext<'_>, outlet: Option<Rendered>) -> Option<Rendered> {
        match self {
            Element::Component(component) => Some(Rendered::Component {
                component: Arc::clone(component),
                outlet: outlet.map(Box::new),
            }),
            Element::Protected(protected) => protected.render(ctx, outlet),
        }
    }
}

/// Route metadata taken from the view config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Handle {
    pub title: Option<String>,
    pub access: AccessProps,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteObject {
    /// URL-pattern segment; empty for the root and index routes
    pub path: String,
    pub module: Option<Arc<ModuleNamespace>>,
    pub element: Option<Element>,
    pub handle: Option<Handle>,
    pub children: Vec<RouteObject>,
}

/// Build a route from a pattern segment, an optional module and children.
///
/// The module's default export becomes the element and its config becomes
/// the handle.
pub fn create_route(
    path: &str,
    module: Option<ModuleNamespace>,
    children: Vec<RouteObject>,
) -> RouteObject {
    let module = module.map(Arc::new);
    let element = module.as_ref().and_then(|m| {
        m.default_export.as_ref().map(|name| {
            Element::Component(Arc::new(Component {
                name: name.clone(),
                module: m.url.clone(),
            }))
        })
    });
    let handle = module
        .as_ref()
        .and_then(|m| m.config.as_ref())
        .map(|config| Handle {
            title: config.title.clone(),
            access: config.access(),
            extra: config.extra.clone(),
        });

    RouteObject {
        path: path.to_string(),
        module,
        element,
        handle,
        children,
    }
}

/// Load every module of a collected tree and build the route objects.
///
/// The first module that fails to load aborts the whole build.
pub fn build_route_objects<L>(tree: &RouteMeta, loader: &L) -> anyhow::Result<RouteObject>
where
    L: ModuleLoader + ?Sized,
{
    let module = tree.module().map(|path| loader.load(path)).transpose()?;
    if let Some(m) = &module {
        if m.default_export.is_none() {
            warn!(module = %m.url.display(), "View module has no default export");
        }
    }
    let children = tree
        .children
        .iter()
        .map(|child| build_route_objects(child, loader))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(create_route(&to_url_pattern(&tree.path), module, children))
}

/// Client-side navigation produced instead of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigate {
    pub to: String,
    /// Location the user asked for, kept so the target can send them back
    pub from: String,
    pub replace: bool,
}

/// Result of rendering a route chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Neutral content while authentication resolves
    Placeholder,
    Redirect(Navigate),
    Component {
        component: Arc<Component>,
        outlet: Option<Box<Rendered>>,
    },
}

impl Rendered {
    /// Component names from the outermost layout inwards.
    pub fn component_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(self);
        while let Some(Rendered::Component { component, outlet }) = current {
            names.push(component.name.as_str());
            current = outlet.as_deref();
        }
        names
    }
}

pub struct RenderContext<'a> {
    pub location: &'a str,
    pub auth: &'a dyn AuthProvider,
}

/// A matched location.
#[derive(Debug)]
pub struct RouteMatch<'r> {
    pub pattern: &'r str,
    /// Routes from the root to the matched one
    pub chain: Vec<&'r RouteObject>,
    pub params: HashMap<String, String>,
}

struct CompiledRoute {
    pattern: String,
    regex: Regex,
    param_names: Vec<String>,
    /// Child indices from the top-level list down to the route
    position: Vec<usize>,
    score: i32,
}

/// Compiled route list.
pub struct RouteTable {
    routes: Vec<RouteObject>,
    compiled: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteObject>) -> anyhow::Result<Self> {
        let mut compiled = Vec::new();
        compile(&routes, "", &mut Vec::new(), &mut compiled)?;

        let routes_summary: Vec<&str> = compiled
            .iter()
            .take(10)
            .map(|c| c.pattern.as_str())
            .collect();
        info!(
            routes_count = compiled.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Self { routes, compiled })
    }

    pub fn routes(&self) -> &[RouteObject] {
        &self.routes
    }

    /// Full patterns of every matchable route, in declaration order.
    pub fn patterns(&self) -> Vec<&str> {
        self.compiled.iter().map(|c| c.pattern.as_str()).collect()
    }

    /// Match a location to the most specific route.
    ///
    /// Static segments outrank parameters, parameters outrank the
    /// catch-all, and an index route outranks its parent layout. Ties go to
    /// the route declared first.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        debug!(path = %path, "Route match attempt");
        let normalized = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        let mut best: Option<(&CompiledRoute, regex::Captures<'_>)> = None;
        for candidate in &self.compiled {
            if let Some(caps) = candidate.regex.captures(normalized) {
                let better = best.as_ref().map_or(true, |(current, _)| {
                    (candidate.score, candidate.position.len())
                        > (current.score, current.position.len())
                });
                if better {
                    best = Some((candidate, caps));
                }
            }
        }

        let Some((route, caps)) = best else {
            warn!(path = %path, "No route matched");
            return None;
        };

        let params: HashMap<String, String> = route
            .param_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| caps.get(i + 1).map(|m| (name.clone(), m.as_str().to_string())))
            .collect();

        let mut chain = Vec::with_capacity(route.position.len());
        let mut level = self.routes.as_slice();
        for &index in &route.position {
            let node = &level[index];
            chain.push(node);
            level = &node.children;
        }

        info!(
            path = %path,
            route_pattern = %route.pattern,
            path_params = ?params,
            "Route matched"
        );
        Some(RouteMatch {
            pattern: &route.pattern,
            chain,
            params,
        })
    }

    /// Render the chain matched by `location`, innermost route first.
    ///
    /// Returns `None` when nothing matches or no route in the chain renders
    /// anything.
    pub fn render(&self, location: &str, auth: &dyn AuthProvider) -> Option<Rendered> {
        let matched = self.match_path(location)?;
        let ctx = RenderContext { location, auth };
        matched
            .chain
            .iter()
            .rev()
            .fold(None, |outlet, route| match &route.element {
                Some(element) => element.render(&ctx, outlet),
                None => outlet,
            })
    }
}

fn compile(
    routes: &[RouteObject],
    parent_pattern: &str,
    position: &mut Vec<usize>,
    out: &mut Vec<CompiledRoute>,
) -> anyhow::Result<()> {
    for (index, route) in routes.iter().enumerate() {
        position.push(index);
        let pattern = join_pattern(parent_pattern, &route.path);
        if route.element.is_some() || route.children.is_empty() {
            let (regex, param_names) = pattern_to_regex(&pattern)?;
            let is_index = route.path.is_empty() && position.len() > 1;
            out.push(CompiledRoute {
                score: score(&pattern) + if is_index { 2 } else { 0 },
                pattern: pattern.clone(),
                regex,
                param_names,
                position: position.clone(),
            });
        }
        compile(&route.children, &pattern, position, out)?;
        position.pop();
    }
    Ok(())
}

fn score(pattern: &str) -> i32 {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| match segment {
            "*" => -2,
            s if s.starts_with(':') && s.ends_with('?') => 2,
            s if s.starts_with(':') => 3,
            _ => 10,
        })
        .sum()
}
