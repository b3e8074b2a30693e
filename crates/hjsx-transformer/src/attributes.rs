//! Attribute classification into snabbdom data buckets.

use hjsx_parser::{Attribute, AttributeValue, ParseError, ParseErrorKind};
use smol_str::SmolStr;

/// A section of the data object passed to the constructor.
///
/// The declaration order is the emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Attrs,
    Class,
    Style,
    On,
    Hook,
    Key,
}

impl Bucket {
    /// Buckets that hold keyed entries, in emission order.
    pub const KEYED: [Bucket; 5] = [
        Bucket::Attrs,
        Bucket::Class,
        Bucket::Style,
        Bucket::On,
        Bucket::Hook,
    ];

    /// The property name in the data object.
    pub fn name(self) -> &'static str {
        match self {
            Bucket::Attrs => "attrs",
            Bucket::Class => "class",
            Bucket::Style => "style",
            Bucket::On => "on",
            Bucket::Hook => "hook",
            Bucket::Key => "key",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Where one attribute goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// A `"key": value` entry in a bucket.
    Keyed { bucket: Bucket, key: SmolStr },
    /// `class_` or `style_`: an object expression merged into the bucket.
    Merge(Bucket),
    /// `key_`: the node key.
    Key,
}

fn invalid(attr: &Attribute, message: impl Into<String>) -> ParseError {
    ParseError::new(
        ParseErrorKind::InvalidAttribute {
            message: message.into(),
        },
        attr.span,
    )
}

fn suffix<'a>(attr: &'a Attribute, prefix: &str) -> Result<Option<&'a str>, ParseError> {
    match attr.name.strip_prefix(prefix) {
        Some("") => Err(invalid(
            attr,
            format!("`{}` needs a name after `{prefix}`", attr.name),
        )),
        other => Ok(other),
    }
}

/// Classifies an attribute by its name.
///
/// Names are checked in priority order: `key_`, `class_`, `style_`, then the
/// `hook-`, `on-` and `class-` prefixes. Everything else, plain `class` and
/// `style` included, is an HTML attribute.
pub fn classify(attr: &Attribute) -> Result<Classified, ParseError> {
    let name = attr.name.as_str();

    match name {
        "key_" => {
            if matches!(attr.value, AttributeValue::True) {
                return Err(invalid(attr, "`key_` must be assigned a value"));
            }
            return Ok(Classified::Key);
        }
        "class_" | "style_" => {
            if !matches!(attr.value, AttributeValue::Expression(_)) {
                return Err(invalid(
                    attr,
                    format!("`{name}` must be assigned an object expression"),
                ));
            }
            let bucket = if name == "class_" {
                Bucket::Class
            } else {
                Bucket::Style
            };
            return Ok(Classified::Merge(bucket));
        }
        _ => {}
    }

    let prefixes = [
        ("hook-", Bucket::Hook),
        ("on-", Bucket::On),
        ("class-", Bucket::Class),
    ];
    for (prefix, bucket) in prefixes {
        if let Some(key) = suffix(attr, prefix)? {
            return Ok(Classified::Keyed {
                bucket,
                key: SmolStr::new(key),
            });
        }
    }

    Ok(Classified::Keyed {
        bucket: Bucket::Attrs,
        key: attr.name.clone(),
    })
}

/// One entry in a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketEntry<V> {
    Keyed { key: SmolStr, value: V },
    Merge(V),
}

impl<V> BucketEntry<V> {
    pub fn is_merge(&self) -> bool {
        matches!(self, BucketEntry::Merge(_))
    }
}

/// The data object of one constructor call, filled in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataObject<V> {
    buckets: [Vec<BucketEntry<V>>; 5],
    key: Option<V>,
}

impl<V> Default for DataObject<V> {
    fn default() -> Self {
        Self {
            buckets: Default::default(),
            key: None,
        }
    }
}

impl<V> DataObject<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no attribute was inserted.
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.buckets.iter().all(Vec::is_empty)
    }

    /// Entries of a keyed bucket in emission order.
    pub fn bucket(&self, bucket: Bucket) -> &[BucketEntry<V>] {
        match bucket {
            Bucket::Key => &[],
            _ => &self.buckets[bucket.index()],
        }
    }

    /// The `key_` value, if any.
    pub fn key(&self) -> Option<&V> {
        self.key.as_ref()
    }

    /// Inserts a classified attribute value.
    ///
    /// A repeated key replaces the earlier value in place. When a merge entry
    /// was inserted in between, the earlier entry is removed and the new one
    /// appended instead, so the later declaration still wins once the merge
    /// is evaluated.
    pub fn insert(&mut self, classified: Classified, value: V) {
        match classified {
            Classified::Key => self.key = Some(value),
            Classified::Merge(bucket) => self.buckets[bucket.index()].push(BucketEntry::Merge(value)),
            Classified::Keyed { bucket, key } => {
                let entries = &mut self.buckets[bucket.index()];
                let existing = entries
                    .iter()
                    .position(|entry| matches!(entry, BucketEntry::Keyed { key: k, .. } if *k == key));
                match existing {
                    Some(idx) if !entries[idx + 1..].iter().any(BucketEntry::is_merge) => {
                        entries[idx] = BucketEntry::Keyed { key, value };
                    }
                    Some(idx) => {
                        entries.remove(idx);
                        entries.push(BucketEntry::Keyed { key, value });
                    }
                    None => entries.push(BucketEntry::Keyed { key, value }),
                }
            }
        }
    }

    /// Non-empty keyed buckets in emission order.
    pub fn keyed_buckets(&self) -> impl Iterator<Item = (Bucket, &[BucketEntry<V>])> {
        Bucket::KEYED
            .into_iter()
            .map(|bucket| (bucket, self.bucket(bucket)))
            .filter(|(_, entries)| !entries.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hjsx_parser::{Expression, Interpolation, Span, StringLiteral};
    use pretty_assertions::assert_eq;

    fn attr(name: &str, value: AttributeValue) -> Attribute {
        Attribute {
            name: SmolStr::new(name),
            name_span: Span::default(),
            value,
            span: Span::default(),
        }
    }

    fn literal(value: &str) -> AttributeValue {
        AttributeValue::Literal(StringLiteral {
            value: value.to_string(),
            span: Span::default(),
        })
    }

    fn expression() -> AttributeValue {
        AttributeValue::Expression(Interpolation {
            expression: Expression::default(),
            span: Span::default(),
        })
    }

    fn keyed(bucket: Bucket, key: &str) -> Classified {
        Classified::Keyed {
            bucket,
            key: SmolStr::new(key),
        }
    }

    #[test]
    fn test_classification() {
        let cases = [
            ("dir", literal("ltr"), keyed(Bucket::Attrs, "dir")),
            ("xmlns:xlink", literal("x"), keyed(Bucket::Attrs, "xmlns:xlink")),
            ("class", literal("button"), keyed(Bucket::Attrs, "class")),
            ("style", literal("color: red"), keyed(Bucket::Attrs, "style")),
            ("checked", AttributeValue::True, keyed(Bucket::Attrs, "checked")),
            ("on-click", expression(), keyed(Bucket::On, "click")),
            ("on-keyUp", expression(), keyed(Bucket::On, "keyUp")),
            ("hook-insert", expression(), keyed(Bucket::Hook, "insert")),
            ("class-bar", expression(), keyed(Bucket::Class, "bar")),
            ("class_", expression(), Classified::Merge(Bucket::Class)),
            ("style_", expression(), Classified::Merge(Bucket::Style)),
            ("key_", expression(), Classified::Key),
            ("key_", literal("k1"), Classified::Key),
        ];
        for (name, value, expected) in cases {
            assert_eq!(classify(&attr(name, value)).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn test_invalid_attributes() {
        let cases = [
            ("on-", expression()),
            ("hook-", expression()),
            ("class-", AttributeValue::True),
            ("class_", literal("a b")),
            ("style_", AttributeValue::True),
            ("key_", AttributeValue::True),
        ];
        for (name, value) in cases {
            let error = classify(&attr(name, value)).unwrap_err();
            assert_eq!(error.kind.code(), "invalid-attribute", "{name}");
        }
    }

    #[test]
    fn test_empty_data_object() {
        let data = DataObject::<&str>::new();
        assert!(data.is_empty());
        assert_eq!(data.keyed_buckets().count(), 0);
    }

    #[test]
    fn test_duplicate_key_replaces_in_place() {
        let mut data = DataObject::new();
        data.insert(keyed(Bucket::Class, "a"), "1");
        data.insert(keyed(Bucket::Class, "b"), "2");
        data.insert(keyed(Bucket::Class, "a"), "3");
        assert_eq!(
            data.bucket(Bucket::Class),
            &[
                BucketEntry::Keyed {
                    key: SmolStr::new("a"),
                    value: "3"
                },
                BucketEntry::Keyed {
                    key: SmolStr::new("b"),
                    value: "2"
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_key_after_merge_moves_to_end() {
        let mut data = DataObject::new();
        data.insert(keyed(Bucket::Class, "a"), "1");
        data.insert(Classified::Merge(Bucket::Class), "obj");
        data.insert(keyed(Bucket::Class, "a"), "2");
        assert_eq!(
            data.bucket(Bucket::Class),
            &[
                BucketEntry::Merge("obj"),
                BucketEntry::Keyed {
                    key: SmolStr::new("a"),
                    value: "2"
                },
            ]
        );
    }

    #[test]
    fn test_last_key_wins() {
        let mut data = DataObject::new();
        data.insert(Classified::Key, "first");
        data.insert(Classified::Key, "second");
        assert_eq!(data.key(), Some(&"second"));
        assert!(!data.is_empty());
    }

    #[test]
    fn test_bucket_order_is_fixed() {
        let mut data = DataObject::new();
        data.insert(keyed(Bucket::Hook, "insert"), "h");
        data.insert(keyed(Bucket::On, "click"), "o");
        data.insert(keyed(Bucket::Attrs, "dir"), "a");
        let order: Vec<_> = data.keyed_buckets().map(|(bucket, _)| bucket.name()).collect();
        assert_eq!(order, vec!["attrs", "on", "hook"]);
    }
}
