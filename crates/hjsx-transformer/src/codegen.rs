//! Emission of lowered code.
//!
//! The emitter writes output text and records a source map entry for every
//! piece it appends: host code and reference tags are copied, quoted strings
//! are derived from their originals, and punctuation is synthetic.

use crate::attributes::{BucketEntry, DataObject};
use crate::lower::{Child, ConstructorCall, Lowered, Piece, Value};
use crate::tag::TagName;
use source_map::{SourceMap, SourceMapBuilder, Span};

/// How `class_` and `style_` objects are merged into their bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectMerge {
    /// `{...(expr), "key": value}`
    #[default]
    Spread,
    /// `Object.assign({}, expr, {"key": value})`, for runtimes without
    /// object spread.
    Assign,
}

/// Quotes `value` as a double-quoted JavaScript string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() && (c as u32) < 0x100 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub(crate) struct Emitter<'a> {
    source: &'a str,
    factory: &'a str,
    merge: ObjectMerge,
    out: String,
    map: SourceMapBuilder,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(source: &'a str, factory: &'a str, merge: ObjectMerge) -> Self {
        Self {
            source,
            factory,
            merge,
            out: String::with_capacity(source.len()),
            map: SourceMapBuilder::new(),
        }
    }

    pub(crate) fn finish(self) -> (String, SourceMap) {
        (self.out, self.map.build())
    }

    fn synthesize(&mut self, text: &str) {
        self.out.push_str(text);
        self.map.synthesize(text);
    }

    fn copy(&mut self, span: Span) {
        let text = span.slice(self.source);
        self.out.push_str(text);
        self.map.copy(span.start, text);
    }

    fn derive(&mut self, original: Span, text: &str) {
        self.out.push_str(text);
        self.map.derive(original, text);
    }

    fn separated<T>(&mut self, items: &[T], mut emit: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.synthesize(", ");
            }
            emit(self, item);
        }
    }

    pub(crate) fn emit_lowered(&mut self, lowered: &Lowered) {
        for piece in &lowered.pieces {
            match piece {
                Piece::Source(span) => self.copy(*span),
                Piece::Call(call) => self.emit_call(call),
            }
        }
    }

    fn emit_call(&mut self, call: &ConstructorCall) {
        let factory = self.factory;
        self.synthesize(factory);
        self.synthesize("(");
        match &call.tag {
            TagName::String(name) => self.derive(call.tag_span, &quote(name)),
            TagName::Expression(_) => self.copy(call.tag_span),
        }
        self.synthesize(", ");
        self.emit_data(&call.data);
        self.synthesize(", ");
        match &call.children {
            None => self.synthesize("null"),
            Some(children) => {
                self.synthesize("[");
                self.separated(children, Self::emit_child);
                self.synthesize("]");
            }
        }
        self.synthesize(")");
    }

    fn emit_child(&mut self, child: &Child) {
        match child {
            Child::Text { value, span } => self.derive(*span, &quote(value)),
            Child::Expression(lowered) => self.emit_lowered(lowered),
            Child::Node(call) => self.emit_call(call),
        }
    }

    fn emit_value(&mut self, value: &Value) {
        match value {
            Value::True => self.synthesize("true"),
            Value::Str { value, span } => self.derive(*span, &quote(value)),
            Value::Code(lowered) => self.emit_lowered(lowered),
        }
    }

    fn emit_data(&mut self, data: &DataObject<Value>) {
        if data.is_empty() {
            self.synthesize("{}");
            return;
        }

        self.synthesize("{");
        let mut first = true;
        for (bucket, entries) in data.keyed_buckets() {
            if !first {
                self.synthesize(", ");
            }
            first = false;
            self.synthesize(bucket.name());
            self.synthesize(": ");
            self.emit_bucket(entries);
        }
        if let Some(key) = data.key() {
            if !first {
                self.synthesize(", ");
            }
            self.synthesize("key: ");
            self.emit_value(key);
        }
        self.synthesize("}");
    }

    fn emit_bucket(&mut self, entries: &[BucketEntry<Value>]) {
        let has_merge = entries.iter().any(BucketEntry::is_merge);
        match self.merge {
            ObjectMerge::Assign if has_merge => {
                self.synthesize("Object.assign({}, ");
                // Consecutive keyed entries share one object literal.
                let mut groups: Vec<&[BucketEntry<Value>]> = Vec::new();
                let mut start = 0;
                for (i, entry) in entries.iter().enumerate() {
                    if entry.is_merge() {
                        if start < i {
                            groups.push(&entries[start..i]);
                        }
                        groups.push(&entries[i..=i]);
                        start = i + 1;
                    }
                }
                if start < entries.len() {
                    groups.push(&entries[start..]);
                }
                self.separated(&groups, |this, group| match group {
                    [BucketEntry::Merge(value)] => this.emit_value(value),
                    keyed => {
                        this.synthesize("{");
                        this.separated(keyed, Self::emit_entry);
                        this.synthesize("}");
                    }
                });
                self.synthesize(")");
            }
            _ => {
                self.synthesize("{");
                self.separated(entries, Self::emit_entry);
                self.synthesize("}");
            }
        }
    }

    fn emit_entry(&mut self, entry: &BucketEntry<Value>) {
        match entry {
            BucketEntry::Keyed { key, value } => {
                self.synthesize(&quote(key));
                self.synthesize(": ");
                self.emit_value(value);
            }
            BucketEntry::Merge(value) => {
                self.synthesize("...(");
                self.emit_value(value);
                self.synthesize(")");
            }
        }
    }
}
