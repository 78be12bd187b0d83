use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use crate::config::{resolve_config, GeneratorConfig};
use crate::generator::{
    endpoint_file_path, generate_client_from_schema, WriteOptions, WriteSummary,
};
use crate::routes::generate_routes_from_views;
use crate::spec::{load_document, EntityBody, SchemaDocument};

/// Command-line interface for clientgen
///
/// Generates TypeScript clients from schema documents and route modules
/// from view directories.
#[derive(Parser)]
#[command(name = "clientgen", version)]
#[command(about = "TypeScript client and file-route generator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate endpoint, entity and model modules from a schema document
    Generate {
        /// Path to the schema document (JSON or YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Output directory for generated modules
        #[arg(short, long)]
        output: PathBuf,

        /// Path to clientgen.toml; auto-detected next to the schema when omitted
        #[arg(short, long, env = "CLIENTGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Overwrite files that were not produced by the generator
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Perform a dry run: show what would change without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Generate the route module and manifest from a views directory
    Routes {
        /// Directory holding page and layout modules
        #[arg(long)]
        views: PathBuf,

        /// Output directory for the route module and manifest
        #[arg(short, long)]
        output: PathBuf,

        /// Path to clientgen.toml; auto-detected inside the views directory when omitted
        #[arg(short, long, env = "CLIENTGEN_CONFIG")]
        config: Option<PathBuf>,

        /// Overwrite files that were not produced by the generator
        #[arg(short, long, default_value_t = false)]
        force: bool,

        /// Perform a dry run: show what would change without writing files
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Print the services and entities found in a schema document
    Inspect {
        /// Path to the schema document (JSON or YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = InspectFormat::Text)]
        format: InspectFormat,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InspectFormat {
    Text,
    Json,
}

/// Execute a parsed command line.
///
/// # Errors
///
/// Returns an error if:
/// - The schema document or config cannot be loaded
/// - A view module cannot be loaded
/// - Any endpoint or entity fails to generate
/// - Files cannot be written
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            schema,
            output,
            config,
            force,
            dry_run,
        } => {
            let config = resolve_config(config.as_deref(), schema.parent())?;
            let options = WriteOptions { force, dry_run };
            let summary = generate_client_from_schema(&schema, &output, &config, options)?;
            print_summary("client", &summary, dry_run);
            Ok(())
        }
        Commands::Routes {
            views,
            output,
            config,
            force,
            dry_run,
        } => {
            let config = resolve_config(config.as_deref(), Some(views.as_path()))?;
            let options = WriteOptions { force, dry_run };
            let summary = generate_routes_from_views(&views, &output, &config, options)?;
            print_summary("routes", &summary, dry_run);
            Ok(())
        }
        Commands::Inspect { schema, format } => {
            let doc = load_document(&schema)?;
            let config = resolve_config(None, schema.parent())?;
            match format {
                InspectFormat::Text => print!("{}", describe_text(&doc, &config, &schema)),
                InspectFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&describe_json(&doc, &config))?)
                }
            }
            Ok(())
        }
    }
}

fn print_summary(what: &str, summary: &WriteSummary, dry_run: bool) {
    if dry_run {
        println!("📝 Dry run ({what}): {} file(s) would be written", summary.planned.len());
        for path in &summary.planned {
            println!("   {}", path.display());
        }
    } else {
        println!(
            "✅ Generated {what}: {} written, {} unchanged",
            summary.written.len(),
            summary.unchanged.len()
        );
    }
    for path in &summary.skipped {
        println!("⚠️  Skipped {} (not generated; use --force to overwrite)", path.display());
    }
}

pub(crate) fn describe_text(doc: &SchemaDocument, config: &GeneratorConfig, source: &Path) -> String {
    let mut out = format!(
        "📄 {} {} ({})\n🔌 services: {}\n",
        doc.title,
        doc.version,
        source.display(),
        doc.services.len()
    );
    for service in &doc.services {
        out.push_str(&format!("  {}.ts\n", endpoint_file_path(service, config)));
        for operation in &service.operations {
            let params: Vec<&str> = operation.parameters.iter().map(|p| p.name.as_str()).collect();
            out.push_str(&format!(
                "    {}({})  {} {}\n",
                operation.name,
                params.join(", "),
                operation.method.to_uppercase(),
                operation.path
            ));
        }
    }
    out.push_str(&format!("🧩 entities: {}\n", doc.entities.len()));
    for entity in &doc.entities {
        let shape = match &entity.body {
            EntityBody::Object(properties) => format!("{} properties", properties.len()),
            EntityBody::Enum(values) => format!("enum of {}", values.len()),
        };
        match &entity.parent {
            Some(parent) => out.push_str(&format!(
                "  {} extends {} ({shape})\n",
                entity.name(),
                parent.full_name
            )),
            None => out.push_str(&format!("  {} ({shape})\n", entity.name())),
        }
    }
    out
}

pub(crate) fn describe_json(doc: &SchemaDocument, config: &GeneratorConfig) -> serde_json::Value {
    json!({
        "title": doc.title,
        "version": doc.version,
        "services": doc.services.iter().map(|service| json!({
            "name": service.name,
            "file": format!("{}.ts", endpoint_file_path(service, config)),
            "operations": service.operations.iter().map(|operation| json!({
                "name": operation.name,
                "method": operation.method,
                "path": operation.path,
                "parameters": operation.parameters.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "entities": doc.entities.iter().map(|entity| json!({
            "name": entity.name(),
            "parent": entity.parent.as_ref().map(|p| p.full_name.as_str()),
            "enum": matches!(entity.body, EntityBody::Enum(_)),
        })).collect::<Vec<_>>(),
    })
}
