//! Markup to hyperscript transformation.
//!
//! This crate rewrites inline tag markup in JavaScript into calls of a
//! snabbdom-style constructor, `h(tag, data, children)`. It handles:
//! - Resolving tag names to string literals or live references
//! - Sorting attributes into the `attrs`, `class`, `style`, `on`, `hook` and
//!   `key` sections of the data object
//! - Normalizing text, interpolations and array literals into children
//! - Building source maps from the output back to the input
//!
//! # Example
//!
//! ```
//! use hjsx_transformer::{transform_source, TransformOptions};
//!
//! let source = r#"var dom = <div dir="ltr" on-click={go}>test</div>;"#;
//! let result = transform_source(source, &TransformOptions::default()).unwrap();
//! assert_eq!(
//!     result.code,
//!     r#"var dom = h("div", {attrs: {"dir": "ltr"}, on: {"click": go}}, ["test"]);"#
//! );
//! ```

mod attributes;
mod children;
mod codegen;
mod lower;
mod tag;
mod transform;

pub use attributes::{classify, Bucket, BucketEntry, Classified, DataObject};
pub use children::normalize_text;
pub use codegen::{quote, ObjectMerge};
pub use lower::{Child, ConstructorCall, Lowered, Piece, Value};
pub use tag::{resolve_tag, TagName};
pub use transform::{transform, transform_source, TransformOptions, TransformResult, DEFAULT_FACTORY};
