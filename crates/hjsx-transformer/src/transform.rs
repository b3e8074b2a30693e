//! Main transformation entry points.

use crate::codegen::{Emitter, ObjectMerge};
use crate::lower::Lowerer;
use hjsx_parser::{parse, ParseError, Program};
use source_map::{ByteOffset, SourceMap};

/// The default constructor function name.
pub const DEFAULT_FACTORY: &str = "h";

/// Options for transforming a file.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// The file name, used in log events.
    pub filename: Option<String>,
    /// The constructor function called for every element.
    pub factory: String,
    /// How `class_` and `style_` objects are merged.
    pub merge: ObjectMerge,
    /// Whether to record a source map.
    pub source_maps: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            filename: None,
            factory: DEFAULT_FACTORY.to_string(),
            merge: ObjectMerge::default(),
            source_maps: true,
        }
    }
}

/// The result of transforming a file.
#[derive(Debug, Clone)]
pub struct TransformResult {
    /// The generated JavaScript.
    pub code: String,
    /// Mappings from generated offsets back to the input. Empty when source
    /// maps are disabled.
    pub source_map: SourceMap,
    /// Number of markup nodes replaced by constructor calls.
    pub node_count: usize,
}

/// Transforms a parsed program.
///
/// Fails only on markup the parser accepts but the lowering rejects, such as
/// an unsupported tag name or an attribute that cannot be classified.
pub fn transform(
    program: &Program,
    source: &str,
    options: &TransformOptions,
) -> Result<TransformResult, ParseError> {
    tracing::trace!(
        filename = options.filename.as_deref().unwrap_or("<input>"),
        markup = program.markup_count(),
        "lowering markup"
    );

    if program.markup_count() == 0 {
        return Ok(TransformResult {
            code: source.to_string(),
            source_map: identity_map(source, options),
            node_count: 0,
        });
    }

    let mut lowerer = Lowerer::new(source);
    let lowered = lowerer.lower_fragment(&program.fragment)?;

    let mut emitter = Emitter::new(source, &options.factory, options.merge);
    emitter.emit_lowered(&lowered);
    let (code, source_map) = emitter.finish();

    Ok(TransformResult {
        code,
        source_map: if options.source_maps {
            source_map
        } else {
            SourceMap::new()
        },
        node_count: lowerer.node_count,
    })
}

/// Parses and transforms a source file.
///
/// Text without markup comes back unchanged. Any error aborts the whole file.
pub fn transform_source(
    source: &str,
    options: &TransformOptions,
) -> Result<TransformResult, ParseError> {
    let program = parse(source)?;
    transform(&program, source, options)
}

fn identity_map(source: &str, options: &TransformOptions) -> SourceMap {
    let mut builder = SourceMap::builder();
    if options.source_maps {
        builder.copy(ByteOffset::from(0u32), source);
    }
    builder.build()
}
