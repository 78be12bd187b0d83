//! Route module and manifest generation.
//!
//! The route module imports every page and layout as a namespace and
//! rebuilds the collected tree with nested `createRoute` calls:
//!
//! ```text
//! import { createRoute } from "@clientgen/file-router/runtime";
//! import * as Page0 from "../views/index.js";
//! import * as Page1 from "../views/about.js";
//!
//! const routes = createRoute("", Page0, [
//!   createRoute("about", Page1)
//! ]);
//!
//! export default routes;
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use crate::config::GeneratorConfig;
use crate::generator::literal::quote;
use crate::generator::{
    relativize, write_generated_file, GeneratedFile, Identifier, OutputFile, WriteOptions,
    WriteSummary,
};

use super::collect::{collect_routes, RouteMeta};
use super::module::FsModuleLoader;
use super::runtime::{build_route_objects, RouteObject};
use super::segment::{join_pattern, pattern_params, to_url_pattern, ParamKind};

/// Render the route module for `tree`.
///
/// Module specifiers are relative to `output_dir`, the directory the route
/// module is written to. Import aliases are numbered in pre-order, one
/// number per visited node.
pub fn generate_routes_module(
    tree: &RouteMeta,
    output_dir: &Path,
    config: &GeneratorConfig,
    source: &str,
) -> Result<GeneratedFile, askama::Error> {
    let logical = Path::new(&config.routes_file).with_extension("");
    let mut file = OutputFile::new(logical.to_string_lossy(), source);
    let create_route = file
        .imports
        .named_import(&config.router_module, "createRoute", false);
    let routes = file.imports.reserve("routes");

    let mut emitter = RouteEmitter {
        file: &mut file,
        output_dir,
        create_route: &create_route,
        next_id: 0,
    };
    let expression = emitter.route(tree, 0);

    file.push(format!("const {routes} = {expression};"));
    file.push(format!("export default {routes};"));

    let mut generated = file.finish()?;
    generated.path = PathBuf::from(&config.routes_file);
    Ok(generated)
}

struct RouteEmitter<'a> {
    file: &'a mut OutputFile,
    output_dir: &'a Path,
    create_route: &'a Identifier,
    next_id: usize,
}

impl RouteEmitter<'_> {
    fn route(&mut self, node: &RouteMeta, depth: usize) -> String {
        let id = self.next_id;
        self.next_id += 1;

        let mut args = vec![quote(&to_url_pattern(&node.path))];
        if let Some(page) = &node.page {
            args.push(self.import(page, "Page", id).to_string());
        } else if let Some(layout) = &node.layout {
            args.push(self.import(layout, "Layout", id).to_string());
        }

        let children: Vec<String> = node
            .children
            .iter()
            .map(|child| self.route(child, depth + 1))
            .collect();
        if !children.is_empty() {
            let indent = "  ".repeat(depth + 1);
            args.push(format!(
                "[\n{indent}{}\n{}]",
                children.join(&format!(",\n{indent}")),
                "  ".repeat(depth)
            ));
        }

        format!("{}({})", self.create_route, args.join(", "))
    }

    fn import(&mut self, module: &Path, kind: &str, id: usize) -> Identifier {
        let specifier = relativize(self.output_dir, &module.with_extension("js"));
        self.file
            .imports
            .namespace_import(&specifier, &format!("{kind}{id}"))
    }
}

/// One route in the JSON manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Full URL pattern
    pub route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub params: BTreeMap<String, ParamKind>,
    pub login_required: bool,
    pub roles_allowed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ManifestEntry>,
}

/// Manifest entries for a route list, nested like the routes.
pub fn build_manifest(routes: &[RouteObject]) -> Vec<ManifestEntry> {
    manifest_level(routes, "")
}

fn manifest_level(routes: &[RouteObject], parent: &str) -> Vec<ManifestEntry> {
    routes
        .iter()
        .map(|route| {
            let pattern = join_pattern(parent, &route.path);
            let access = route.handle.as_ref().map(|h| h.access.clone()).unwrap_or_default();
            ManifestEntry {
                params: pattern_params(&pattern).into_iter().collect(),
                title: route.handle.as_ref().and_then(|h| h.title.clone()),
                login_required: access.login_required || access.requires_login,
                roles_allowed: access.roles_allowed,
                children: manifest_level(&route.children, &pattern),
                route: pattern,
            }
        })
        .collect()
}

/// Pretty-printed manifest file.
pub fn render_manifest(
    entries: &[ManifestEntry],
    config: &GeneratorConfig,
) -> serde_json::Result<GeneratedFile> {
    let json = serde_json::to_string_pretty(entries)?;
    Ok(GeneratedFile {
        path: PathBuf::from(&config.manifest_file),
        contents: format!("{json}\n"),
    })
}

/// Collect `views_dir`, load every view module and write the route module
/// and manifest into `output_dir`.
///
/// A view module that cannot be loaded stops the run before anything is
/// written.
pub fn generate_routes_from_views(
    views_dir: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
    options: WriteOptions,
) -> anyhow::Result<WriteSummary> {
    let views_dir = std::path::absolute(views_dir)
        .with_context(|| format!("Invalid views directory: {}", views_dir.display()))?;
    let output_dir = std::path::absolute(output_dir)
        .with_context(|| format!("Invalid output directory: {}", output_dir.display()))?;

    let tree = collect_routes(&views_dir, config)?;
    let root = build_route_objects(&tree, &FsModuleLoader)?;

    let source = views_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| views_dir.display().to_string());
    let module = generate_routes_module(&tree, &output_dir, config, &source)
        .context("Failed to render route module")?;
    let manifest = render_manifest(&build_manifest(std::slice::from_ref(&root)), config)
        .context("Failed to render route manifest")?;

    let mut summary = WriteSummary::default();
    let outcome = write_generated_file(&output_dir.join(&module.path), &module.contents, options)?;
    summary.record(output_dir.join(&module.path), outcome);
    // the manifest carries no header, so it is always owned by the generator
    let manifest_options = WriteOptions {
        force: true,
        ..options
    };
    let outcome =
        write_generated_file(&output_dir.join(&manifest.path), &manifest.contents, manifest_options)?;
    summary.record(output_dir.join(&manifest.path), outcome);

    info!(
        views_dir = %views_dir.display(),
        output = %output_dir.display(),
        routes_count = tree.count(),
        written = summary.written.len(),
        unchanged = summary.unchanged.len(),
        "Route generation finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{create_route, ModuleNamespace, ViewConfig};

    fn leaf(path: &str, page: &str) -> RouteMeta {
        RouteMeta {
            path: path.to_string(),
            page: Some(PathBuf::from(page)),
            ..RouteMeta::default()
        }
    }

    #[test]
    fn test_nested_create_route_calls() {
        let tree = RouteMeta {
            path: String::new(),
            page: Some(PathBuf::from("/app/views/index.tsx")),
            layout: None,
            children: vec![
                leaf("about", "/app/views/about.tsx"),
                RouteMeta {
                    path: "blog".into(),
                    page: Some(PathBuf::from("/app/views/blog/index.tsx")),
                    layout: None,
                    children: vec![leaf("{slug}", "/app/views/blog/[slug].tsx")],
                },
            ],
        };
        let out = generate_routes_module(
            &tree,
            Path::new("/app/generated"),
            &GeneratorConfig::default(),
            "views",
        )
        .unwrap();

        assert_eq!(out.path, PathBuf::from("views.ts"));
        let text = &out.contents;
        assert!(text.contains("import { createRoute } from \"@clientgen/file-router/runtime\";"));
        assert!(text.contains("import * as Page0 from \"../views/index.js\";"));
        assert!(text.contains("import * as Page1 from \"../views/about.js\";"));
        assert!(text.contains("import * as Page2 from \"../views/blog/index.js\";"));
        assert!(text.contains("import * as Page3 from \"../views/blog/[slug].js\";"));
        assert!(text.contains(
            "const routes = createRoute(\"\", Page0, [\n  createRoute(\"about\", Page1),\n  createRoute(\"blog\", Page2, [\n    createRoute(\":slug\", Page3)\n  ])\n]);"
        ));
        assert!(text.ends_with("export default routes;\n"));

        let create = text.find("import { createRoute }").unwrap();
        let page0 = text.find("import * as Page0").unwrap();
        assert!(create < page0);
    }

    #[test]
    fn test_layout_node_without_module_children_only() {
        let tree = RouteMeta {
            path: String::new(),
            page: None,
            layout: Some(PathBuf::from("/v/@layout.tsx")),
            children: vec![
                leaf("", "/v/@index.tsx"),
                RouteMeta {
                    path: "docs".into(),
                    children: vec![leaf("{...path}", "/v/docs/[...path].tsx")],
                    ..RouteMeta::default()
                },
            ],
        };
        let out =
            generate_routes_module(&tree, Path::new("/v"), &GeneratorConfig::default(), "v")
                .unwrap();
        let text = &out.contents;
        assert!(text.contains("import * as Layout0 from \"./@layout.js\";"));
        assert!(text.contains("import * as Page1 from \"./@index.js\";"));
        assert!(text.contains("import * as Page3 from \"./docs/[...path].js\";"));
        assert!(text.contains("createRoute(\"docs\", [\n    createRoute(\"*\", Page3)\n  ])"));
    }

    #[test]
    fn test_manifest_entries() {
        let admin = ModuleNamespace {
            url: PathBuf::from("admin.tsx"),
            default_export: Some("Admin".into()),
            config: Some(ViewConfig {
                title: Some("Admin".into()),
                login_required: true,
                roles_allowed: vec!["ADMIN".into()],
                ..ViewConfig::default()
            }),
        };
        let root = create_route(
            "",
            None,
            vec![
                create_route("admin", Some(admin), vec![]),
                create_route("users", None, vec![create_route(":id?", None, vec![])]),
            ],
        );
        let entries = build_manifest(&[root]);
        assert_eq!(entries[0].route, "/");
        let admin = &entries[0].children[0];
        assert_eq!(admin.route, "/admin");
        assert_eq!(admin.title.as_deref(), Some("Admin"));
        assert!(admin.login_required);
        assert_eq!(admin.roles_allowed, vec!["ADMIN"]);
        let user = &entries[0].children[1].children[0];
        assert_eq!(user.route, "/users/:id?");
        assert_eq!(user.params.get("id"), Some(&ParamKind::Optional));

        let file = render_manifest(&entries, &GeneratorConfig::default()).unwrap();
        assert_eq!(file.path, PathBuf::from("file-routes.json"));
        let parsed: serde_json::Value = serde_json::from_str(&file.contents).unwrap();
        assert_eq!(parsed[0]["children"][0]["rolesAllowed"][0], "ADMIN");
        assert_eq!(parsed[0]["children"][1]["children"][0]["params"]["id"], "opt");
    }
}
