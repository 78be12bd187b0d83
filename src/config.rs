//! Generator configuration
//!
//! Settings live in an optional `clientgen.toml` that sits next to the
//! schema document (or inside the views directory). Every key has a default,
//! so a missing file is not an error.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "clientgen.toml";

/// Module specifiers and naming conventions used in generated code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Module exporting the transport client as its default export.
    /// Relative specifiers are resolved against the output root.
    pub client_module: String,
    /// Module exporting the form models and validators
    pub form_module: String,
    /// Module exporting `createRoute`
    pub router_module: String,
    /// Appended to an entity name to name its model class and file
    pub model_suffix: String,
    /// Appended to a service name to name its endpoint file
    pub endpoint_suffix: String,
    /// File extensions recognized as view modules, with the leading dot
    pub view_extensions: Vec<String>,
    /// File name of the generated route module
    pub routes_file: String,
    /// File name of the generated route manifest
    pub manifest_file: String,
    /// Where the route guard sends users without access
    pub redirect_path: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            client_module: "./connect-client.default".to_string(),
            form_module: "@clientgen/form".to_string(),
            router_module: "@clientgen/file-router/runtime".to_string(),
            model_suffix: "Model".to_string(),
            endpoint_suffix: "Endpoint".to_string(),
            view_extensions: [".tsx", ".jsx", ".ts", ".js"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            routes_file: "views.ts".to_string(),
            manifest_file: "file-routes.json".to_string(),
            redirect_path: "/login".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Whether `extension` (without the dot) names a view module.
    pub fn is_view_extension(&self, extension: &str) -> bool {
        self.view_extensions
            .iter()
            .any(|e| e.trim_start_matches('.') == extension)
    }
}

/// Load a config file.
///
/// Returns `Ok(None)` if the file does not exist and `Err` if it exists but
/// cannot be read or parsed.
pub fn load_config(config_path: &Path) -> anyhow::Result<Option<GeneratorConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let config: GeneratorConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    Ok(Some(config))
}

/// Look for `clientgen.toml` in `dir`.
pub fn auto_detect_config_path(dir: &Path) -> Option<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Resolve and load the effective configuration.
///
/// Priority:
/// 1. Explicitly provided path (must exist)
/// 2. `clientgen.toml` in `search_dir`
/// 3. Defaults
pub fn resolve_config(
    explicit_path: Option<&Path>,
    search_dir: Option<&Path>,
) -> anyhow::Result<GeneratorConfig> {
    if let Some(path) = explicit_path {
        return load_config(path)?
            .with_context(|| format!("Config file not found: {}", path.display()));
    }

    match search_dir.and_then(auto_detect_config_path) {
        Some(path) => {
            tracing::debug!(config = %path.display(), "Using auto-detected config");
            Ok(load_config(&path)?.unwrap_or_default())
        }
        None => Ok(GeneratorConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "form_module = \"@acme/form\"\nredirect_path = \"/signin\"\n").unwrap();

        let config = resolve_config(None, Some(dir.path())).unwrap();
        assert_eq!(config.form_module, "@acme/form");
        assert_eq!(config.redirect_path, "/signin");
        assert_eq!(config.model_suffix, "Model");
        assert_eq!(config.routes_file, "views.ts");
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "form_modul = \"typo\"\n").unwrap();
        let err = resolve_config(Some(&path), None).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_config(Some(&dir.path().join("missing.toml")), None).is_err());
    }

    #[test]
    fn test_view_extensions() {
        let config = GeneratorConfig::default();
        assert!(config.is_view_extension("tsx"));
        assert!(!config.is_view_extension("css"));
    }
}
