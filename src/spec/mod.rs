//! # Spec Module
//!
//! Loads OpenAPI 3 documents (JSON or YAML) and turns them into the
//! generator's input model:
//!
//! - **[`SchemaNode`]** - one schema unit with its nullability, annotation and
//!   validation-constraint modifiers
//! - **[`ServiceDef`] / [`OperationDef`]** - backend services grouped from the
//!   document's paths (by first tag, falling back to the first path segment)
//! - **[`EntityDef`]** - named component schemas, including `allOf`
//!   inheritance and string enums
//!
//! Property and path order follow the document, so generated output is
//! stable for a given input.

mod build;
mod load;
mod types;

pub use build::{build_document, to_camel_case, to_pascal_case};
pub use load::{load_document, load_document_from_value};
pub use types::*;
