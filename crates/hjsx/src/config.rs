//! Configuration loading.

use crate::cli::{Args, MergeStrategy, RunMode};
use camino::{Utf8Path, Utf8PathBuf};
use hjsx_transformer::{TransformOptions, DEFAULT_FACTORY};
use serde::Deserialize;
use std::fs;

/// The project configuration file name.
pub const CONFIG_FILE: &str = "hjsx.config.json";

/// Extensions transformed when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".jsx"];

/// Output directory used when none is configured.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Project configuration from `hjsx.config.json`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Constructor function name.
    pub factory: Option<String>,
    /// Merge strategy for `class_` and `style_`.
    pub merge: Option<MergeStrategy>,
    /// File extensions to transform.
    pub extensions: Vec<String>,
    /// Glob patterns to ignore.
    pub ignore: Vec<String>,
    /// Output directory, relative to the workspace.
    pub out_dir: Option<Utf8PathBuf>,
}

impl ProjectConfig {
    /// Loads the configuration file from a project root.
    ///
    /// A missing file yields the defaults. So does a malformed one, after a
    /// warning.
    pub fn load(project_root: &Utf8Path) -> Self {
        let path = project_root.join(CONFIG_FILE);
        let Ok(content) = fs::read_to_string(&path) else {
            return Self::default();
        };

        match Self::parse(&content) {
            Ok(config) => {
                tracing::debug!(path = %path, "loaded configuration");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "ignoring malformed configuration");
                Self::default()
            }
        }
    }

    /// Parses configuration JSON. Comments are allowed.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(&remove_json_comments(content))
    }
}

/// Settings for one run, after command-line flags override the file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub workspace: Utf8PathBuf,
    pub out_dir: Utf8PathBuf,
    pub extensions: Vec<String>,
    pub ignore: Vec<String>,
    pub mode: RunMode,
    pub transform: TransformOptions,
}

impl Settings {
    pub fn resolve(args: &Args, workspace: Utf8PathBuf, config: ProjectConfig) -> Self {
        let extensions: Vec<String> = if !args.extensions.is_empty() {
            args.extensions.clone()
        } else if !config.extensions.is_empty() {
            config.extensions
        } else {
            DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
        };

        let out_dir = args
            .out_dir
            .clone()
            .or(config.out_dir)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUT_DIR));

        let mut ignore = config.ignore;
        ignore.extend(args.ignore.iter().cloned());

        let transform = TransformOptions {
            filename: None,
            factory: args
                .factory
                .clone()
                .or(config.factory)
                .unwrap_or_else(|| DEFAULT_FACTORY.to_string()),
            merge: args.merge.or(config.merge).unwrap_or_default().into(),
            source_maps: false,
        };

        Self {
            out_dir: workspace.join(out_dir),
            workspace,
            extensions: extensions.into_iter().map(normalize_extension).collect(),
            ignore,
            mode: args.mode(),
            transform,
        }
    }

    /// Whether `file_name` has one of the configured extensions.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }
}

fn normalize_extension(ext: String) -> String {
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// Removes single-line and multi-line comments from JSON.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
        } else if c == '"' {
            result.push(c);
            in_string = true;
        } else if c == '/' && chars.peek() == Some(&'/') {
            while chars.peek().is_some_and(|&next| next != '\n') {
                chars.next();
            }
        } else if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(next) = chars.next() {
                if next == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
