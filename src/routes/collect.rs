//! Route tree collection from a views directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::GeneratorConfig;

use super::segment::{normalize_segment, strip_order_prefix};

/// One node of the collected route tree.
///
/// `path` is a single normalized segment (`about`, `{slug}`, `{...rest}`,
/// `{{lang}}`); the root and index children use the empty string. A node
/// references at most one module: a directory holding both a layout and an
/// index page keeps the layout and moves the page into an empty-path first
/// child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteMeta>,
}

impl RouteMeta {
    /// Module rendered by this node, page first.
    pub fn module(&self) -> Option<&Path> {
        self.page.as_deref().or(self.layout.as_deref())
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(RouteMeta::count).sum::<usize>()
    }
}

enum Entry {
    Directory(PathBuf),
    File(PathBuf),
}

struct Candidate {
    order: Option<u32>,
    name: String,
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
}

/// Walk `views_dir` and build the route tree.
///
/// The returned root always exists, even for an empty directory.
pub fn collect_routes(views_dir: &Path, config: &GeneratorConfig) -> anyhow::Result<RouteMeta> {
    if !views_dir.is_dir() {
        anyhow::bail!("Views directory not found: {}", views_dir.display());
    }
    let root = collect_dir(views_dir, String::new(), config)?.unwrap_or_default();
    info!(
        views_dir = %views_dir.display(),
        routes_count = root.count(),
        "Collected route tree"
    );
    Ok(root)
}

fn collect_dir(
    dir: &Path,
    segment: String,
    config: &GeneratorConfig,
) -> anyhow::Result<Option<RouteMeta>> {
    let mut node = RouteMeta {
        path: segment,
        ..RouteMeta::default()
    };
    // keyed by stripped name so `about.tsx` and `about/` meet
    let mut candidates: BTreeMap<String, Candidate> = BTreeMap::new();

    for entry in read_entries(dir)? {
        let (path, is_dir) = match entry {
            Entry::Directory(path) => (path, true),
            Entry::File(path) => (path, false),
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file_name.starts_with('_') || file_name.starts_with('.') {
            debug!(entry = %path.display(), "Ignoring private entry");
            continue;
        }

        let stem = if is_dir {
            file_name.clone()
        } else {
            let extension = path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !config.is_view_extension(&extension) {
                debug!(entry = %path.display(), "Ignoring non-view file");
                continue;
            }
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        if !is_dir {
            match stem.as_str() {
                "layout" | "@layout" => {
                    set_once(&mut node.layout, path, "layout");
                    continue;
                }
                "index" | "@index" => {
                    set_once(&mut node.page, path, "index page");
                    continue;
                }
                s if s.starts_with('@') => {
                    warn!(entry = %path.display(), "Ignoring unrecognized reserved file name");
                    continue;
                }
                _ => {}
            }
        }

        let (order, name) = strip_order_prefix(&stem);
        let candidate = candidates
            .entry(name.to_string())
            .or_insert_with(|| Candidate {
                order,
                name: name.to_string(),
                dir: None,
                file: None,
            });
        candidate.order = candidate.order.or(order);
        if is_dir {
            set_once(&mut candidate.dir, path, "directory");
        } else {
            set_once(&mut candidate.file, path, "view file");
        }
    }

    let mut candidates: Vec<Candidate> = candidates.into_values().collect();
    candidates.sort_by(|a, b| {
        (a.order.is_none(), a.order, &a.name).cmp(&(b.order.is_none(), b.order, &b.name))
    });

    for candidate in candidates {
        let segment = normalize_segment(&candidate.name);
        let child = match candidate.dir {
            Some(child_dir) => {
                let mut child = collect_dir(&child_dir, segment.clone(), config)?;
                if let Some(file) = candidate.file {
                    child = Some(merge_sibling_file(child, segment, file));
                }
                child
            }
            None => candidate.file.map(|file| RouteMeta {
                path: segment,
                page: Some(file),
                ..RouteMeta::default()
            }),
        };
        node.children.extend(child);
    }

    if node.layout.is_some() {
        if let Some(page) = node.page.take() {
            node.children.insert(
                0,
                RouteMeta {
                    path: String::new(),
                    page: Some(page),
                    ..RouteMeta::default()
                },
            );
        }
    }

    if node.page.is_none() && node.children.is_empty() {
        debug!(dir = %dir.display(), "Pruning directory without routes");
        return Ok(None);
    }
    Ok(Some(node))
}

/// `about.tsx` next to `about/` is the page of the `about` node.
fn merge_sibling_file(dir_node: Option<RouteMeta>, segment: String, file: PathBuf) -> RouteMeta {
    let mut node = dir_node.unwrap_or_else(|| RouteMeta {
        path: segment,
        ..RouteMeta::default()
    });
    let page_child = |file| RouteMeta {
        path: String::new(),
        page: Some(file),
        ..RouteMeta::default()
    };
    if node.layout.is_some() {
        if node.children.first().is_some_and(|c| c.path.is_empty()) {
            warn!(file = %file.display(), "Directory already has an index page; ignoring file");
        } else {
            node.children.insert(0, page_child(file));
        }
    } else if node.page.is_some() {
        warn!(file = %file.display(), "Directory already has an index page; ignoring file");
    } else {
        node.page = Some(file);
    }
    node
}

fn set_once(slot: &mut Option<PathBuf>, path: PathBuf, what: &str) {
    match slot {
        Some(existing) => warn!(
            kept = %existing.display(),
            ignored = %path.display(),
            kind = what,
            "Duplicate route entry"
        ),
        None => *slot = Some(path),
    }
}

fn read_entries(dir: &Path) -> anyhow::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to read views directory: {}", dir.display()))?;
        // symlinked directories are not descended into
        let is_dir = entry.file_type().is_dir();
        let path = entry.into_path();
        if is_dir {
            entries.push(Entry::Directory(path));
        } else {
            entries.push(Entry::File(path));
        }
    }
    Ok(entries)
}
