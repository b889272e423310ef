//! Type model for inferred JSON shapes
//!
//! Every node describes the values observed at one structural position of the
//! input documents. Nodes are produced by the classifier and combined by
//! [`merge_types`](crate::infer::merge_types).

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Marker of the document root
pub const ROOT_POSITION: &str = "$";

/// Marker of an array element position
pub const ITEMS_SEGMENT: &str = "*";

/// Structural path at which a node was observed, e.g. `$/users/*/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Position(String);

impl Position {
    pub fn new(path: impl Into<String>) -> Self {
        Position(path.into())
    }

    pub fn root() -> Self {
        Position(ROOT_POSITION.to_string())
    }

    /// Position of the field `name` of the object at this position
    pub fn field(&self, name: &str) -> Self {
        Position(format!("{}/{}", self.0, name))
    }

    /// Position shared by every element of the array at this position
    pub fn items(&self) -> Self {
        Position(format!("{}/{}", self.0, ITEMS_SEGMENT))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_POSITION
    }

    /// Path segments below the root marker
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0
            .strip_prefix(ROOT_POSITION)
            .unwrap_or(&self.0)
            .split('/')
            .filter(|segment| !segment.is_empty())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind tag of a type node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeEnum {
    String,
    Int,
    Float,
    Bool,
    None,
    Object,
    Array,
    OneOf,
    Never,
}

impl TypeEnum {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeEnum::String => "string",
            TypeEnum::Int => "int",
            TypeEnum::Float => "float",
            TypeEnum::Bool => "bool",
            TypeEnum::None => "none",
            TypeEnum::Object => "object",
            TypeEnum::Array => "array",
            TypeEnum::OneOf => "one_of",
            TypeEnum::Never => "never",
        }
    }
}

impl fmt::Display for TypeEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primitive kinds that carry no payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Int,
    Float,
    Bool,
    None,
}

impl ScalarKind {
    pub fn type_enum(self) -> TypeEnum {
        match self {
            ScalarKind::Int => TypeEnum::Int,
            ScalarKind::Float => TypeEnum::Float,
            ScalarKind::Bool => TypeEnum::Bool,
            ScalarKind::None => TypeEnum::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarDef {
    pub position: Position,
    pub kind: ScalarKind,
}

/// Occurrence counts of the exact strings seen at one position
///
/// With a `limit`, at most that many distinct values are retained. A value
/// arriving after the limit is reached only marks the histogram as
/// overflowed; its occurrences are still counted in [`total`](Self::total).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueHistogram {
    counts: IndexMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    overflowed: bool,
    untracked: u64,
}

impl ValueHistogram {
    pub fn new(limit: Option<usize>) -> Self {
        ValueHistogram {
            counts: IndexMap::new(),
            limit,
            overflowed: false,
            untracked: 0,
        }
    }

    pub fn single(value: impl Into<String>, limit: Option<usize>) -> Self {
        let mut histogram = ValueHistogram::new(limit);
        histogram.record(value.into(), 1);
        histogram
    }

    /// Add `count` occurrences of `value`
    pub fn record(&mut self, value: String, count: u64) {
        if let Some(existing) = self.counts.get_mut(&value) {
            *existing += count;
            return;
        }

        let has_room = self.limit.map_or(true, |limit| self.counts.len() < limit);
        if has_room {
            self.counts.insert(value, count);
        } else {
            self.overflowed = true;
            self.untracked += count;
        }
    }

    /// Sum counts and union keys; keys already present keep their position
    pub fn merge(&mut self, other: ValueHistogram) {
        self.limit = match (self.limit, other.limit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.overflowed |= other.overflowed;
        self.untracked += other.untracked;
        for (value, count) in other.counts {
            self.record(value, count);
        }
    }

    /// Number of distinct values retained
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn count(&self, value: &str) -> Option<u64> {
        self.counts.get(value).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum::<u64>() + self.untracked
    }

    /// Retained values in first-seen order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

/// A string leaf with the histogram of its observed values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringDef {
    pub position: Position,
    pub values: ValueHistogram,
}

impl StringDef {
    pub fn merge(&mut self, other: StringDef) {
        self.values.merge(other.values);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectDef {
    pub position: Position,
    /// Fields in first-seen order
    pub properties: IndexMap<String, TypeDef>,
    /// Fields missing from at least one observed object
    pub not_required: BTreeSet<String>,
    /// Number of observed objects each field appeared in
    pub keys_statistic: IndexMap<String, u64>,
    pub merge_count: u64,
}

impl ObjectDef {
    pub fn new(position: Position, properties: IndexMap<String, TypeDef>) -> Self {
        let keys_statistic = properties.keys().map(|key| (key.clone(), 1)).collect();
        ObjectDef {
            position,
            properties,
            not_required: BTreeSet::new(),
            keys_statistic,
            merge_count: 0,
        }
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.properties.contains_key(key) && !self.not_required.contains(key)
    }

    /// Number of objects folded into this node
    pub fn observed(&self) -> u64 {
        self.merge_count + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayDef {
    pub position: Position,
    pub items: Box<TypeDef>,
}

/// Union of mutually incompatible alternatives at one position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneOfDef {
    pub position: Position,
    pub items: Vec<TypeDef>,
}

impl OneOfDef {
    /// True when the union is `None` plus exactly one other alternative
    pub fn is_optional(&self) -> bool {
        self.items.len() == 2 && self.items.iter().any(TypeDef::is_none)
    }
}

/// A node of the inferred type tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeDef {
    /// No value observed yet; the identity of merging
    Never,
    Scalar(ScalarDef),
    String(StringDef),
    Object(ObjectDef),
    Array(ArrayDef),
    OneOf(OneOfDef),
}

impl TypeDef {
    pub fn scalar(position: Position, kind: ScalarKind) -> Self {
        TypeDef::Scalar(ScalarDef { position, kind })
    }

    pub fn string(position: Position, value: impl Into<String>, limit: Option<usize>) -> Self {
        TypeDef::String(StringDef {
            position,
            values: ValueHistogram::single(value, limit),
        })
    }

    pub fn array(position: Position, items: TypeDef) -> Self {
        TypeDef::Array(ArrayDef {
            position,
            items: Box::new(items),
        })
    }

    pub fn type_enum(&self) -> TypeEnum {
        match self {
            TypeDef::Never => TypeEnum::Never,
            TypeDef::Scalar(scalar) => scalar.kind.type_enum(),
            TypeDef::String(_) => TypeEnum::String,
            TypeDef::Object(_) => TypeEnum::Object,
            TypeDef::Array(_) => TypeEnum::Array,
            TypeDef::OneOf(_) => TypeEnum::OneOf,
        }
    }

    /// Position of the node; `Never` has none
    pub fn position(&self) -> Option<&Position> {
        match self {
            TypeDef::Never => None,
            TypeDef::Scalar(scalar) => Some(&scalar.position),
            TypeDef::String(string) => Some(&string.position),
            TypeDef::Object(object) => Some(&object.position),
            TypeDef::Array(array) => Some(&array.position),
            TypeDef::OneOf(one_of) => Some(&one_of.position),
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, TypeDef::Never)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TypeDef::Scalar(ScalarDef { kind: ScalarKind::None, .. }))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, TypeDef::Object(_))
    }

    pub fn is_one_of(&self) -> bool {
        matches!(self, TypeDef::OneOf(_))
    }
}
