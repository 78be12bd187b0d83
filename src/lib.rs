//! # clientgen
//!
//! **clientgen** generates the TypeScript side of a typed client/server
//! application: endpoint modules and form models from an OpenAPI-shaped
//! schema document, and a route module from a directory of views.
//!
//! ## Overview
//!
//! Two independent pipelines share one output model:
//!
//! - **Client generation** - every backend service becomes an endpoint
//!   module with one async function per operation; every entity becomes a
//!   type module and a form model module whose accessors carry validators.
//! - **File routing** - a views directory is collected into a route tree,
//!   emitted as nested `createRoute` calls plus a JSON manifest, and can be
//!   matched, guarded and rendered at runtime from Rust.
//!
//! ## Architecture
//!
//! - **[`spec`]** - schema document loading and service/entity extraction
//! - **[`schema`]** - schema node classification and decomposition
//! - **[`generator`]** - processors, emitters, import resolution and file output
//! - **[`routes`]** - route collection, route code generation, runtime routes and the route guard
//! - **[`security`]** - access requirements and authentication state
//! - **[`transport`]** - the call contract generated endpoint functions rely on
//! - **[`config`]** - `clientgen.toml`
//! - **[`logging`]** - tracing subscriber setup
//! - **[`cli`]** - the `clientgen` command line
//!
//! ### Client Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(clientgen)
//!     participant Spec as spec::load_document
//!     participant Gen as generator::generate_sources
//!     participant Proc as generator::processor
//!     participant Out as generator::OutputFile
//!     participant FS as File System
//!
//!     CLI->>Spec: load_document("openapi.json")
//!     Spec-->>CLI: SchemaDocument
//!     CLI->>Gen: generate_sources(&doc, &config)
//!     par one unit per service and entity
//!         Gen->>Proc: classify + process each schema node
//!         Proc->>Out: imports, type and validator expressions
//!         Out-->>Gen: GeneratedFile
//!     end
//!     Gen-->>CLI: Generation { files, failures }
//!     CLI->>FS: write_generated_files (skip unchanged)
//! ```
//!
//! ### Route Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(clientgen routes)
//!     participant Collect as routes::collect_routes
//!     participant Loader as routes::FsModuleLoader
//!     participant Codegen as routes::generate_routes_module
//!     participant FS as File System
//!
//!     CLI->>Collect: views/
//!     Collect-->>CLI: RouteMeta tree
//!     CLI->>Loader: load every page and layout
//!     Loader-->>CLI: RouteObject tree (config → handle)
//!     CLI->>Codegen: tree + output dir
//!     Codegen-->>CLI: views.ts
//!     CLI->>FS: views.ts + file-routes.json
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! clientgen generate --schema openapi.json --output frontend/generated
//! clientgen routes --views frontend/views --output frontend/generated
//! ```
//!
//! From code:
//!
//! ```rust,no_run
//! use clientgen::config::GeneratorConfig;
//! use clientgen::generator::generate_sources;
//! use clientgen::spec::load_document;
//!
//! let doc = load_document(std::path::Path::new("openapi.json"))?;
//! let generation = generate_sources(&doc, &GeneratorConfig::default(), "openapi.json");
//! for file in &generation.files {
//!     println!("{}", file.path.display());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Generated Files
//!
//! Every generated TypeScript file starts with a header naming its source
//! document. Existing files without that header are never overwritten
//! unless `--force` is given, and files whose content did not change are
//! not rewritten.

pub mod cli;
pub mod config;
pub mod generator;
pub mod logging;
pub mod routes;
pub mod schema;
pub mod security;
pub mod spec;
pub mod transport;

pub use config::GeneratorConfig;
pub use generator::{generate_sources, GenerateError, GeneratedFile, Generation};
pub use routes::{collect_routes, protect_routes, RouteMeta, RouteObject, RouteTable};
pub use spec::{load_document, SchemaDocument};
