//! View module loading.
//!
//! Route generation only needs two facts about a view module: the name of
//! its default export and its optional `config` object. The file-system
//! loader reads them from source text; the config must be a plain literal.
//!
//! ```text
//! export const config = { title: 'Admin', rolesAllowed: ['ADMIN'] };
//! export default function AdminView() { ... }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::generator::literal::parse_prefix;
use crate::security::AccessProps;
use crate::spec::to_pascal_case;

static DEFAULT_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*export\s+default\s+(async\s+)?((?:function\*?|class)\s+)?([A-Za-z_$][\w$]*)")
        .expect("default export regex should be valid")
});

/// First argument of a call such as `memo(View)` or `memo(function View() {})`.
static CALL_ARGUMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\(\s*(?:async\s+)?((?:function\*?|class)\s+)?([A-Za-z_$][\w$]*)?")
        .expect("call argument regex should be valid")
});

static CONFIG_EXPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*export\s+const\s+config\s*(?::\s*[A-Za-z_$][\w$.<>]*\s*)?=")
        .expect("config export regex should be valid")
});

/// The `config` export of a view module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    pub title: Option<String>,
    pub login_required: bool,
    pub requires_login: bool,
    pub roles_allowed: Vec<String>,
    /// Keys the router does not interpret (menu entries, flags)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewConfig {
    pub fn access(&self) -> AccessProps {
        AccessProps {
            login_required: self.login_required,
            requires_login: self.requires_login,
            roles_allowed: self.roles_allowed.clone(),
        }
    }
}

/// What a loaded view module exposes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleNamespace {
    pub url: PathBuf,
    /// Name of the default-exported component
    pub default_export: Option<String>,
    pub config: Option<ViewConfig>,
}

/// Loads view modules by path.
pub trait ModuleLoader {
    fn load(&self, path: &Path) -> anyhow::Result<ModuleNamespace>;
}

impl<F> ModuleLoader for F
where
    F: Fn(&Path) -> anyhow::Result<ModuleNamespace>,
{
    fn load(&self, path: &Path) -> anyhow::Result<ModuleNamespace> {
        self(path)
    }
}

/// Reads modules from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsModuleLoader;

impl ModuleLoader for FsModuleLoader {
    fn load(&self, path: &Path) -> anyhow::Result<ModuleNamespace> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load view module: {}", path.display()))?;
        parse_module(path, &source)
    }
}

/// Extract the default export and config of a module's source text.
pub fn parse_module(url: &Path, source: &str) -> anyhow::Result<ModuleNamespace> {
    let default_export = default_export_name(url, source);

    let config = match CONFIG_EXPORT.find(source) {
        Some(found) => {
            let (literal, _) = parse_prefix(&source[found.end()..])
                .with_context(|| format!("Invalid view config in {}", url.display()))?;
            let config: ViewConfig = serde_json::from_value(Value::from(&literal))
                .with_context(|| format!("Invalid view config in {}", url.display()))?;
            Some(config)
        }
        None => None,
    };

    Ok(ModuleNamespace {
        url: url.to_path_buf(),
        default_export,
        config,
    })
}

/// Component name of the default export.
///
/// Wrapping calls (`memo(View)`, `observer(memo(View))`) are looked through;
/// anonymous components are named after the file.
fn default_export_name(url: &Path, source: &str) -> Option<String> {
    let caps = DEFAULT_EXPORT.captures(source)?;
    let first = caps.get(3)?;
    let mut name = first.as_str();
    if caps.get(2).is_none() {
        let mut rest = &source[first.end()..];
        while let Some(argument) = CALL_ARGUMENT.captures(rest) {
            match argument.get(2) {
                Some(inner) if argument.get(1).is_some() => {
                    name = inner.as_str();
                    break;
                }
                Some(inner) => {
                    name = inner.as_str();
                    rest = &rest[inner.end()..];
                }
                None => {
                    name = "function";
                    break;
                }
            }
        }
    }
    Some(match name {
        "function" | "class" | "async" => url
            .file_stem()
            .map(|stem| to_pascal_case(&stem.to_string_lossy()))
            .unwrap_or_else(|| "View".to_string()),
        other => other.to_string(),
    })
}
