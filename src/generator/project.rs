use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, error, info, warn};

use crate::config::GeneratorConfig;
use crate::spec::load_document;

use super::output::GENERATED_MARKER;
use super::{generate_sources, GeneratedFile};

/// How generated files are written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Overwrite files that were not produced by the generator
    pub force: bool,
    /// Report what would be written without touching the disk
    pub dry_run: bool,
}

/// What happened to one generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Existing content is identical
    Unchanged,
    /// Existing file is not generated and `force` is off
    Skipped,
    /// Would have been written
    Planned,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub planned: Vec<PathBuf>,
}

impl WriteSummary {
    pub fn record(&mut self, path: PathBuf, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written => self.written.push(path),
            WriteOutcome::Unchanged => self.unchanged.push(path),
            WriteOutcome::Skipped => self.skipped.push(path),
            WriteOutcome::Planned => self.planned.push(path),
        }
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.unchanged.len() + self.skipped.len() + self.planned.len()
    }
}

/// Write one file.
///
/// Identical content is left alone. A file that exists but does not carry
/// the generated-file marker belongs to the user and is only replaced with
/// `force`.
pub fn write_generated_file(
    path: &Path,
    contents: &str,
    options: WriteOptions,
) -> anyhow::Result<WriteOutcome> {
    if path.exists() {
        let existing = fs::read_to_string(path)
            .with_context(|| format!("Failed to read existing file: {}", path.display()))?;
        if existing == contents {
            return Ok(WriteOutcome::Unchanged);
        }
        if !existing.contains(GENERATED_MARKER) && !options.force {
            warn!(file = %path.display(), "Skipping existing file not created by the generator (use --force to overwrite)");
            return Ok(WriteOutcome::Skipped);
        }
    }

    if options.dry_run {
        return Ok(WriteOutcome::Planned);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    debug!(file = %path.display(), "Wrote generated file");
    Ok(WriteOutcome::Written)
}

/// Write a batch of files below `root`.
pub fn write_generated_files(
    root: &Path,
    files: &[GeneratedFile],
    options: WriteOptions,
) -> anyhow::Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    for file in files {
        let path = root.join(&file.path);
        let outcome = write_generated_file(&path, &file.contents, options)?;
        summary.record(path, outcome);
    }
    Ok(summary)
}

/// Load a schema document, generate the client sources and write them.
///
/// Units that fail to generate are logged and reported as an error after
/// every other file has been written.
pub fn generate_client_from_schema(
    schema_path: &Path,
    output_dir: &Path,
    config: &GeneratorConfig,
    options: WriteOptions,
) -> anyhow::Result<WriteSummary> {
    let doc = load_document(schema_path)?;
    let source = schema_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| schema_path.display().to_string());

    let generation = generate_sources(&doc, config, &source);
    let summary = write_generated_files(output_dir, &generation.files, options)?;

    info!(
        output = %output_dir.display(),
        written = summary.written.len(),
        unchanged = summary.unchanged.len(),
        skipped = summary.skipped.len(),
        planned = summary.planned.len(),
        "Client generation finished"
    );

    if !generation.failures.is_empty() {
        for failure in &generation.failures {
            error!(error = %failure, "Generation failed");
        }
        let names: Vec<String> = generation.failures.iter().map(ToString::to_string).collect();
        anyhow::bail!(
            "{} unit(s) failed to generate: {}",
            generation.failures.len(),
            names.join("; ")
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/B.ts");
        let contents = format!("// {GENERATED_MARKER}\nexport {{}};\n");
        let options = WriteOptions::default();
        assert_eq!(write_generated_file(&path, &contents, options).unwrap(), WriteOutcome::Written);
        assert_eq!(write_generated_file(&path, &contents, options).unwrap(), WriteOutcome::Unchanged);
    }

    #[test]
    fn test_generated_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("X.ts");
        fs::write(&path, format!("// {GENERATED_MARKER}\nold\n")).unwrap();
        let outcome =
            write_generated_file(&path, "// new\n", WriteOptions::default()).unwrap();
        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "// new\n");
    }

    #[test]
    fn test_user_file_needs_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("X.ts");
        fs::write(&path, "hand written\n").unwrap();

        let outcome = write_generated_file(&path, "new\n", WriteOptions::default()).unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hand written\n");

        let forced = WriteOptions { force: true, dry_run: false };
        assert_eq!(write_generated_file(&path, "new\n", forced).unwrap(), WriteOutcome::Written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![GeneratedFile {
            path: PathBuf::from("deep/Y.ts"),
            contents: "x\n".to_string(),
        }];
        let options = WriteOptions { force: false, dry_run: true };
        let summary = write_generated_files(dir.path(), &files, options).unwrap();
        assert_eq!(summary.planned.len(), 1);
        assert_eq!(summary.total(), 1);
        assert!(!dir.path().join("deep").exists());
    }
}
