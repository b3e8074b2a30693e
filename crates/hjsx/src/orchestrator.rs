//! Main orchestration logic.

use crate::cli::{Args, OutputFormat, RunMode};
use crate::config::{ProjectConfig, Settings};
use crate::output::{Formatter, RunSummary};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use hjsx_parser::ParseError;
use hjsx_transformer::{transform_source, TransformOptions, TransformResult};
use rayon::prelude::*;
use std::fs;
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

/// Driver errors that stop the whole run.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// The workspace path is not usable.
    #[error("invalid workspace: {0}")]
    InvalidWorkspace(String),

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What happened to one input file.
#[derive(Debug)]
pub enum FileOutcome {
    Transformed(TransformResult),
    Failed(ParseError),
    Unreadable(String),
}

/// The result for one input file.
#[derive(Debug)]
pub struct FileReport {
    /// Path relative to the workspace when possible.
    pub path: Utf8PathBuf,
    pub source: String,
    pub outcome: FileOutcome,
}

/// Runs the transform on all files.
pub fn run(args: Args) -> Result<RunSummary, DriverError> {
    let workspace = absolute_workspace(&args.workspace)?;
    let config = ProjectConfig::load(&workspace);
    let settings = Settings::resolve(&args, workspace, config);

    let scan_start = Instant::now();
    let files = if args.paths.is_empty() {
        discover_files(&settings)?
    } else {
        args.paths
            .iter()
            .map(|path| {
                if path.is_relative() {
                    settings.workspace.join(path)
                } else {
                    path.clone()
                }
            })
            .collect()
    };
    tracing::debug!(count = files.len(), elapsed = ?scan_start.elapsed(), "discovered files");

    let reports = transform_files(&files, &settings);
    report(&reports, &settings, args.output)
}

fn absolute_workspace(workspace: &Utf8Path) -> Result<Utf8PathBuf, DriverError> {
    if workspace.is_absolute() {
        return Ok(workspace.to_path_buf());
    }
    let cwd = std::env::current_dir()
        .map_err(|e| DriverError::InvalidWorkspace(e.to_string()))?;
    let cwd = Utf8PathBuf::try_from(cwd)
        .map_err(|e| DriverError::InvalidWorkspace(e.to_string()))?;
    Ok(cwd.join(workspace))
}

/// Builds the ignore set: defaults, the output directory and user globs.
pub fn build_ignore_set(settings: &Settings) -> Result<GlobSet, DriverError> {
    let mut builder = GlobSetBuilder::new();

    let mut patterns = vec![
        "**/node_modules/**".to_string(),
        "**/dist/**".to_string(),
    ];
    if let Ok(out_dir) = settings.out_dir.strip_prefix(&settings.workspace) {
        if !out_dir.as_str().is_empty() {
            patterns.push(format!("{}/**", out_dir));
        }
    }
    patterns.extend(settings.ignore.iter().cloned());

    for pattern in &patterns {
        let glob = Glob::new(pattern).map_err(|e| DriverError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| DriverError::InvalidGlob(e.to_string()))
}

/// Walks the workspace for files with a configured extension.
pub fn discover_files(settings: &Settings) -> Result<Vec<Utf8PathBuf>, DriverError> {
    let ignore_set = build_ignore_set(settings)?;
    let workspace = &settings.workspace;

    let mut files: Vec<Utf8PathBuf> = WalkDir::new(workspace)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| settings.matches_extension(p.file_name().unwrap_or("")))
        .filter(|p| {
            let relative = p.strip_prefix(workspace).unwrap_or(p);
            !ignore_set.is_match(relative.as_str())
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Transforms files in parallel. Reports come back sorted by path.
pub fn transform_files(files: &[Utf8PathBuf], settings: &Settings) -> Vec<FileReport> {
    let mut reports: Vec<FileReport> = files
        .par_iter()
        .map(|file_path| {
            let path = file_path
                .strip_prefix(&settings.workspace)
                .map(Utf8Path::to_path_buf)
                .unwrap_or_else(|_| file_path.clone());

            let source = match fs::read_to_string(file_path) {
                Ok(source) => source,
                Err(e) => {
                    return FileReport {
                        path,
                        source: String::new(),
                        outcome: FileOutcome::Unreadable(e.to_string()),
                    }
                }
            };

            let options = TransformOptions {
                filename: Some(path.to_string()),
                ..settings.transform.clone()
            };

            let start = Instant::now();
            let outcome = match transform_source(&source, &options) {
                Ok(result) => {
                    tracing::debug!(
                        file = %path,
                        nodes = result.node_count,
                        elapsed = ?start.elapsed(),
                        "transformed"
                    );
                    FileOutcome::Transformed(result)
                }
                Err(error) => FileOutcome::Failed(error),
            };

            FileReport {
                path,
                source,
                outcome,
            }
        })
        .collect();

    reports.sort_by(|a, b| a.path.cmp(&b.path));
    reports
}

/// Where the output for `relative` is written.
pub fn output_path(out_dir: &Utf8Path, relative: &Utf8Path) -> Utf8PathBuf {
    let relative = if relative.is_absolute() {
        Utf8Path::new(relative.file_name().unwrap_or(relative.as_str()))
    } else {
        relative
    };
    let mut target = out_dir.join(relative);
    target.set_extension("js");
    target
}

fn write_output(target: &Utf8Path, code: &str) -> Result<(), DriverError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, code)
    };
    write().map_err(|source| DriverError::WriteFailed {
        path: target.to_path_buf(),
        source,
    })
}

/// Writes or emits outputs and prints errors and the summary.
///
/// With `--emit`, stdout carries only code; diagnostics go to stderr.
fn report(
    reports: &[FileReport],
    settings: &Settings,
    format: OutputFormat,
) -> Result<RunSummary, DriverError> {
    let formatter = Formatter::new(format);
    let mut summary = RunSummary {
        file_count: reports.len(),
        ..Default::default()
    };
    let mut json_output = Vec::new();
    let diagnostics_to_stderr = settings.mode == RunMode::Emit;

    for report in reports {
        match &report.outcome {
            FileOutcome::Transformed(result) => {
                summary.node_count += result.node_count;
                match settings.mode {
                    RunMode::Check => {}
                    RunMode::Emit => {
                        if reports.len() > 1 {
                            println!("// {}", report.path);
                        }
                        print!("{}", result.code);
                    }
                    RunMode::Write => {
                        let target = output_path(&settings.out_dir, &report.path);
                        write_output(&target, &result.code)?;
                        tracing::info!(file = %report.path, output = %target, "wrote");
                        summary.written_count += 1;
                    }
                }
            }
            FileOutcome::Failed(error) => {
                summary.error_count += 1;
                if format == OutputFormat::Json {
                    json_output.push(Formatter::format_json_diagnostic(
                        error,
                        &report.path,
                        &report.source,
                    ));
                } else {
                    let formatted = formatter.format(error, &report.path, &report.source);
                    if diagnostics_to_stderr {
                        eprint!("{}", formatted);
                    } else {
                        print!("{}", formatted);
                    }
                }
            }
            FileOutcome::Unreadable(message) => {
                summary.error_count += 1;
                tracing::error!(file = %report.path, error = %message, "failed to read");
            }
        }
    }

    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| "[]".to_string());
        if diagnostics_to_stderr {
            eprintln!("{}", json);
        } else {
            println!("{}", json);
        }
    } else if settings.mode != RunMode::Emit {
        println!("{}", summary.format());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn settings_for(root: &Utf8Path, argv: &[&str]) -> Settings {
        let args = Args::parse_from(argv);
        Settings::resolve(&args, root.to_path_buf(), ProjectConfig::default())
    }

    fn write(root: &Utf8Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Utf8Path::new("/p/dist"), Utf8Path::new("src/app.jsx")),
            Utf8PathBuf::from("/p/dist/src/app.js")
        );
        assert_eq!(
            output_path(Utf8Path::new("/p/dist"), Utf8Path::new("/elsewhere/view.hjs")),
            Utf8PathBuf::from("/p/dist/view.js")
        );
    }

    #[test]
    fn test_discover_files_skips_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        write(root, "src/app.jsx", "x = <div/>;");
        write(root, "src/util.js", "export {};");
        write(root, "node_modules/pkg/index.jsx", "x = <p/>;");
        write(root, "dist/src/app.jsx", "x = <p/>;");
        write(root, "legacy/old.jsx", "x = <p/>;");

        let settings = settings_for(root, &["hjsx", "--ignore", "legacy/**"]);
        let files = discover_files(&settings).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string())
            .collect();
        assert_eq!(relative, vec!["src/app.jsx"]);
    }

    #[test]
    fn test_custom_out_dir_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        write(root, "a.jsx", "x = <a/>;");
        write(root, "build/a.jsx", "x = <a/>;");

        let settings = settings_for(root, &["hjsx", "--out-dir", "build"]);
        let files = discover_files(&settings).unwrap();
        assert_eq!(files, vec![root.join("a.jsx")]);
    }

    #[test]
    fn test_invalid_glob() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let settings = settings_for(root, &["hjsx", "--ignore", "a/{b"]);
        assert!(matches!(
            discover_files(&settings),
            Err(DriverError::InvalidGlob(_))
        ));
    }

    #[test]
    fn test_transform_files_sorted_with_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        write(root, "b.jsx", "x = <div>");
        write(root, "a.jsx", "x = <div>hi</div>;");

        let settings = settings_for(root, &["hjsx"]);
        let files = vec![root.join("b.jsx"), root.join("a.jsx"), root.join("missing.jsx")];
        let reports = transform_files(&files, &settings);

        let paths: Vec<_> = reports.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a.jsx", "b.jsx", "missing.jsx"]);
        assert!(matches!(
            &reports[0].outcome,
            FileOutcome::Transformed(result) if result.code == r#"x = h("div", {}, ["hi"]);"#
        ));
        assert!(matches!(&reports[1].outcome, FileOutcome::Failed(_)));
        assert!(matches!(&reports[2].outcome, FileOutcome::Unreadable(_)));
    }
}
