//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use hjsx_parser::ParseError;
use serde::Serialize;
use source_map::LineIndex;

/// A formatted error for JSON output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// Always `Error`; transforms have no warnings.
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    /// The file path.
    pub filename: String,
    /// The start position.
    pub start: Position,
    /// The end position.
    pub end: Position,
    /// The message.
    pub message: String,
    /// The stable error code.
    pub code: String,
    /// `lexical`, `structural` or `semantic-gap`.
    pub category: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

/// Formats transform errors for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the error for one file. JSON output is collected separately
    /// through [`Formatter::format_json_diagnostic`].
    pub fn format(&self, error: &ParseError, file_path: &Utf8Path, source: &str) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(error, file_path, source),
            OutputFormat::HumanVerbose => self.format_human_verbose(error, file_path, source),
            OutputFormat::Json => {
                let formatted = Self::format_json_diagnostic(error, file_path, source);
                serde_json::to_string_pretty(&formatted).unwrap_or_default()
            }
            OutputFormat::Machine => self.format_machine(error, file_path, source),
        }
    }

    fn format_human(&self, error: &ParseError, file_path: &Utf8Path, source: &str) -> String {
        let start = LineIndex::new(source).line_col(error.span.start);
        format!(
            "{}:{}:{}\nError: {} ({})\n\n",
            file_path,
            start.line + 1,
            start.col + 1,
            error,
            error.kind.code()
        )
    }

    fn format_human_verbose(&self, error: &ParseError, file_path: &Utf8Path, source: &str) -> String {
        let line_index = LineIndex::new(source);
        let start = line_index.line_col(error.span.start);

        let mut output = format!(
            "{}:{}:{}\nError: {} ({})\n",
            file_path,
            start.line + 1,
            start.col + 1,
            error,
            error.kind.code()
        );

        if let Some(line) = line_index.line_text(start.line, source) {
            let gutter = (start.line + 1).to_string();
            output.push_str(&format!("  {} | {}\n", gutter, line));
            output.push_str(&format!(
                "  {} | {}^\n",
                " ".repeat(gutter.len()),
                " ".repeat(start.col as usize)
            ));
        }

        output.push('\n');
        output
    }

    /// Formats an error into a JSON-ready struct.
    pub fn format_json_diagnostic(
        error: &ParseError,
        file_path: &Utf8Path,
        source: &str,
    ) -> FormattedDiagnostic {
        let line_index = LineIndex::new(source);
        let start = line_index.line_col(error.span.start);
        let end = line_index.line_col(error.span.end);

        FormattedDiagnostic {
            diagnostic_type: "Error".to_string(),
            filename: file_path.to_string(),
            start: Position {
                line: start.line + 1,
                column: start.col + 1,
                offset: u32::from(error.span.start),
            },
            end: Position {
                line: end.line + 1,
                column: end.col + 1,
                offset: u32::from(error.span.end),
            },
            message: error.to_string(),
            code: error.kind.code().to_string(),
            category: error.kind.category().as_str().to_string(),
        }
    }

    fn format_machine(&self, error: &ParseError, file_path: &Utf8Path, source: &str) -> String {
        let line_index = LineIndex::new(source);
        let start = line_index.line_col(error.span.start);
        let end = line_index.line_col(error.span.end);

        format!(
            "ERROR {}:{}:{}:{}:{} {} ({})\n",
            file_path,
            start.line + 1,
            start.col + 1,
            end.line + 1,
            end.col + 1,
            error,
            error.kind.code()
        )
    }
}

/// Summary of a run.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Number of files processed.
    pub file_count: usize,
    /// Number of files that failed.
    pub error_count: usize,
    /// Number of markup nodes lowered across all files.
    pub node_count: usize,
    /// Number of output files written.
    pub written_count: usize,
}

impl RunSummary {
    /// Whether every file transformed.
    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let error_word = if self.error_count == 1 {
            "error"
        } else {
            "errors"
        };
        let file_word = if self.file_count == 1 {
            "file"
        } else {
            "files"
        };
        let node_word = if self.node_count == 1 {
            "node"
        } else {
            "nodes"
        };

        format!(
            "====================================\nhjsx processed {} {} ({} {}, {} written) with {} {}",
            self.file_count,
            file_word,
            self.node_count,
            node_word,
            self.written_count,
            self.error_count,
            error_word
        )
    }
}
