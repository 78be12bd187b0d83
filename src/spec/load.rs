use super::build::build_document;
use super::types::SchemaDocument;
use anyhow::Context;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Parse document text as YAML or JSON depending on the file extension.
pub(crate) fn parse_text(path: &Path, content: &str) -> anyhow::Result<Value> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    let value = if is_yaml {
        serde_yaml::from_str(content)
            .with_context(|| format!("Failed to parse YAML document {}", path.display()))?
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("Failed to parse JSON document {}", path.display()))?
    };
    Ok(value)
}

/// Load a schema document from a `.json`, `.yaml` or `.yml` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or is not
/// an OpenAPI 3.x document.
pub fn load_document(path: &Path) -> anyhow::Result<SchemaDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema document {}", path.display()))?;
    let value = parse_text(path, &content)?;
    let document = build_document(&value)?;
    info!(
        document = %path.display(),
        title = %document.title,
        services = document.services.len(),
        entities = document.entities.len(),
        "Schema document loaded"
    );
    Ok(document)
}

/// Build a [`SchemaDocument`] from an already parsed JSON value.
pub fn load_document_from_value(value: &Value) -> anyhow::Result<SchemaDocument> {
    build_document(value)
}
