//! # CLI Module
//!
//! Command-line front end of the `clientgen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate endpoint, entity and model modules from a schema document:
//!
//! ```bash
//! clientgen generate --schema openapi.json --output frontend/generated
//! ```
//!
//! Options:
//! - `--schema <FILE>` - Schema document, JSON or YAML (required)
//! - `--output <DIR>` - Output directory (required)
//! - `--config <FILE>` - `clientgen.toml`; auto-detected next to the schema
//! - `--force` - Overwrite files the generator did not write
//! - `--dry-run` - List the files that would change
//!
//! ### `routes`
//!
//! Generate the route module and `file-routes.json` from a views directory:
//!
//! ```bash
//! clientgen routes --views frontend/views --output frontend/generated
//! ```
//!
//! ### `inspect`
//!
//! Print what a schema document contains:
//!
//! ```bash
//! clientgen inspect --schema openapi.json --format json
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use clientgen::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands, InspectFormat};
