//! In-memory accumulator for one generated module.

use std::path::PathBuf;

use askama::Template;

use super::imports::{relative_path, Identifier, ImportTable};
use super::templates::ModuleTemplate;
use super::GeneratedFile;

/// Marker placed in the header of every generated file.
pub const GENERATED_MARKER: &str = "Generated by clientgen";

/// One generated module: its import table plus ordered declarations.
///
/// Declarations are appended in the order the emitter produces them. Imports
/// are added lazily by processors while declarations are built, so alias
/// collisions resolve in declaration order.
#[derive(Debug)]
pub struct OutputFile {
    /// Logical `/`-separated location, without extension
    path: String,
    pub imports: ImportTable,
    declarations: Vec<String>,
    source: String,
    own_binding: Option<Identifier>,
}

impl OutputFile {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            imports: ImportTable::new(),
            declarations: Vec::new(),
            source: source.into(),
            own_binding: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Bind the name this module declares and default-exports.
    ///
    /// References to the module's own path resolve to this binding instead
    /// of a self-import.
    pub fn bind_own(&mut self, name: &str) -> Identifier {
        let id = self.imports.reserve(name);
        self.own_binding = Some(id.clone());
        id
    }

    /// Module specifier of another generated module, relative to this one.
    pub fn module_specifier(&self, target: &str) -> String {
        format!("{}.js", relative_path(&self.path, target))
    }

    /// Specifier for a configured module: relative ones are taken from the
    /// output root, bare ones are used as-is.
    pub fn external_specifier(&self, module: &str) -> String {
        match module.strip_prefix("./") {
            Some(root_relative) => self.module_specifier(root_relative),
            None => module.to_string(),
        }
    }

    /// Default import of the generated module at `target`.
    pub fn import_default(&mut self, target: &str, name: &str, type_only: bool) -> Identifier {
        if target == self.path {
            if let Some(own) = &self.own_binding {
                return own.clone();
            }
        }
        let specifier = self.module_specifier(target);
        self.imports.default_import(&specifier, name, type_only)
    }

    pub fn push(&mut self, declaration: impl Into<String>) {
        self.declarations.push(declaration.into());
    }

    /// Render the module text.
    pub fn finish(self) -> Result<GeneratedFile, askama::Error> {
        let module_name = self.path.rsplit('/').next().unwrap_or(&self.path).to_string();
        let template = ModuleTemplate {
            marker: GENERATED_MARKER,
            source: &self.source,
            module_name: &module_name,
            imports: self.imports.render(),
            declarations: &self.declarations,
        };
        let rendered = template.render()?;
        Ok(GeneratedFile {
            path: PathBuf::from(format!("{}.ts", self.path)),
            contents: format!("{}\n", rendered.trim_end()),
        })
    }
}
