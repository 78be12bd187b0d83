//! # Routes Module
//!
//! File-system routing: a views directory becomes a route tree, the tree
//! becomes a generated route module, and at runtime the same tree becomes
//! [`RouteObject`]s that can be matched, guarded and rendered.
//!
//! ## Naming Conventions
//!
//! | On disk | Meaning | URL pattern |
//! |---|---|---|
//! | `index.tsx`, `@index.tsx` | page of the directory | |
//! | `layout.tsx`, `@layout.tsx` | layout wrapping the directory | |
//! | `about.tsx` | static segment | `about` |
//! | `[id].tsx`, `{id}.tsx` | dynamic segment | `:id` |
//! | `[[lang]]`, `{{lang}}` | optional segment | `:lang?` |
//! | `[...path]`, `{...path}` | catch-all | `*` |
//! | `01-intro.tsx` | ordered before unprefixed siblings | `intro` |
//! | `_helpers.tsx` | ignored | |
//!
//! ## Flow
//!
//! ```text
//! views/ ──collect_routes──▶ RouteMeta ──generate_routes_module──▶ views.ts
//!                                │
//!                                └──build_route_objects──▶ RouteObject ──protect_routes──▶ RouteTable
//! ```

mod codegen;
mod collect;
mod guard;
mod module;
mod runtime;
mod segment;

pub use codegen::{
    build_manifest, generate_routes_from_views, generate_routes_module, render_manifest,
    ManifestEntry,
};
pub use collect::{collect_routes, RouteMeta};
pub use guard::{protect_routes, ProtectedElement};
pub use module::{parse_module, FsModuleLoader, ModuleLoader, ModuleNamespace, ViewConfig};
pub use runtime::{
    build_route_objects, create_route, Component, Element, Handle, Navigate, RenderContext,
    Rendered, RouteMatch, RouteObject, RouteTable,
};
pub use segment::{
    join_pattern, normalize_segment, pattern_params, pattern_to_regex, strip_order_prefix,
    to_url_pattern, ParamKind,
};
