//! # Generator Module
//!
//! Turns a loaded [`SchemaDocument`] into TypeScript client sources.
//!
//! ## Overview
//!
//! For every backend service the generator emits an **endpoint module** with
//! one exported async function per operation plus a frozen aggregate object.
//! For every entity it emits a **type module** (interface or enum) and a
//! **model module** (form model class with one accessor per property and its
//! validators).
//!
//! ## Architecture
//!
//! ```text
//! SchemaDocument → Classifier → Processors → Emitters → OutputFile → text
//!                                   ↑                       ↑
//!                               ImportTable ────────────────┘
//! ```
//!
//! 1. **Classifier** (`crate::schema`) - decides the kind of each schema node
//! 2. **Processors** ([`processor`]) - compute types, model classes and
//!    validator arguments through one [`SchemaVisitor`] trait
//! 3. **Emitters** ([`endpoint`], [`entity`]) - assemble declarations with
//!    Askama templates
//! 4. **Import resolver** ([`imports`]) - per-file import table and relative
//!    module paths
//!
//! Output files are independent of each other, so they are generated in
//! parallel and collected back in document order.
//!
//! ## Generated Structure
//!
//! ```text
//! <output>/
//! ├── OrdersEndpoint.ts          # one per service
//! └── com/example/
//!     ├── Order.ts               # interface Order
//!     └── OrderModel.ts          # class OrderModel
//! ```

pub mod annotation;
pub mod endpoint;
pub mod entity;
pub mod expr;
pub mod imports;
pub mod literal;
pub mod output;
pub mod processor;
mod project;
mod templates;

use std::path::PathBuf;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::spec::{EntityDef, SchemaDocument, ServiceDef};

pub use annotation::{AnnotationError, AnnotationParser};
pub use endpoint::{emit_endpoint, endpoint_file_path};
pub use entity::{emit_entity_model, emit_entity_type, model_file_path};
pub use expr::{Expr, TypeExpr};
pub use imports::{relative_path, relativize, Identifier, ImportTable};
pub use output::{OutputFile, GENERATED_MARKER};
pub use processor::{
    dispatch, ModelIdentifierProcessor, ModelTypeProcessor, SchemaView, SchemaVisitor,
    TypeProcessor, ValidatorProcessor,
};
pub use project::{
    generate_client_from_schema, write_generated_file, write_generated_files, WriteOptions,
    WriteOutcome, WriteSummary,
};

/// A rendered file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Failure to generate one endpoint or entity.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid validator on `{entity}.{property}`: {source}")]
    Validator {
        entity: String,
        property: String,
        #[source]
        source: AnnotationError,
    },
    #[error("failed to render `{unit}`: {source}")]
    Render {
        unit: String,
        #[source]
        source: askama::Error,
    },
}

/// Result of generating a whole document.
///
/// A failing unit (service or entity) does not stop the others; its files
/// are left out and the error is collected.
#[derive(Debug, Default)]
pub struct Generation {
    pub files: Vec<GeneratedFile>,
    pub failures: Vec<GenerateError>,
}

impl Generation {
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == PathBuf::from(path))
    }
}

enum Unit<'d> {
    Endpoint(&'d ServiceDef),
    Entity(&'d EntityDef),
}

fn render(file: OutputFile, unit: &str) -> Result<GeneratedFile, GenerateError> {
    file.finish().map_err(|source| GenerateError::Render {
        unit: unit.to_string(),
        source,
    })
}

fn generate_unit(
    unit: &Unit<'_>,
    config: &GeneratorConfig,
    source: &str,
) -> Result<Vec<GeneratedFile>, GenerateError> {
    match unit {
        Unit::Endpoint(service) => {
            let file = emit_endpoint(service, config, source)?;
            Ok(vec![render(file, &service.name)?])
        }
        Unit::Entity(entity) => {
            let ty = emit_entity_type(entity, source)?;
            let model = emit_entity_model(entity, config, source)?;
            Ok(vec![render(ty, entity.name())?, render(model, entity.name())?])
        }
    }
}

/// Generate every endpoint and entity module of a document.
///
/// `source` names the document in the generated file headers.
pub fn generate_sources(doc: &SchemaDocument, config: &GeneratorConfig, source: &str) -> Generation {
    let units: Vec<Unit<'_>> = doc
        .services
        .iter()
        .map(Unit::Endpoint)
        .chain(doc.entities.iter().map(Unit::Entity))
        .collect();

    let results: Vec<Result<Vec<GeneratedFile>, GenerateError>> = units
        .par_iter()
        .map(|unit| generate_unit(unit, config, source))
        .collect();

    let mut generation = Generation::default();
    for result in results {
        match result {
            Ok(files) => generation.files.extend(files),
            Err(err) => {
                warn!(error = %err, "Generation unit failed");
                generation.failures.push(err);
            }
        }
    }

    info!(
        services = doc.services.len(),
        entities = doc.entities.len(),
        files = generation.files.len(),
        failures = generation.failures.len(),
        "Generated client sources"
    );
    generation
}
