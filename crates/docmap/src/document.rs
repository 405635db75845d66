// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic document tree.
//!
//! The loosely-typed representation exchanged with document stores: scalars,
//! ordered sequences and string-keyed objects, nested arbitrarily. Objects keep
//! their key order.

use indexmap::IndexMap;
use std::sync::Arc;

/// String-keyed, order-preserving object body.
pub type DocumentMap = IndexMap<String, Document>;

/// Leaf value of a document tree.
///
/// String and binary payloads are reference counted: cloning a `Scalar` shares
/// the payload, which is how the encoder copies scalar fields "verbatim".
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(Arc<str>),
    Binary(Arc<[u8]>),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
}

impl Scalar {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::DateTime(_) => "datetime",
        }
    }
}

/// A node of the generic document tree.
///
/// Array and object bodies are reference counted like string payloads, so
/// cloning a document of any size is O(1). Mutation through
/// [`get_mut`](Self::get_mut) or [`insert`](Self::insert) copies a shared body
/// first.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Scalar(Scalar),
    Array(Arc<Vec<Document>>),
    Object(Arc<DocumentMap>),
}

impl Default for Document {
    fn default() -> Self {
        Self::Scalar(Scalar::Null)
    }
}

impl Document {
    /// The null document.
    pub const NULL: Document = Document::Scalar(Scalar::Null);

    /// Build an object from `(key, value)` pairs, keeping their order.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Document)>,
    {
        Self::Object(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Build an array.
    pub fn array<I: IntoIterator<Item = Document>>(items: I) -> Self {
        Self::Array(Arc::new(items.into_iter().collect()))
    }

    /// Short description of the node kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(s) => s.kind_name(),
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Check if the document is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as double (integers widen).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Double(v)) => Some(*v),
            Self::Scalar(Scalar::Int(v)) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(v)) => Some(v),
            _ => None,
        }
    }

    /// Try to get as binary.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Scalar(Scalar::Binary(v)) => Some(v),
            _ => None,
        }
    }

    /// Try to get as array.
    pub fn as_array(&self) -> Option<&[Document]> {
        match self {
            Self::Array(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Try to get as object.
    pub fn as_object(&self) -> Option<&DocumentMap> {
        match self {
            Self::Object(map) => Some(&**map),
            _ => None,
        }
    }

    /// Object member lookup; `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_object()?.get(key)
    }

    /// Mutable object member lookup.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        match self {
            Self::Object(map) => Arc::make_mut(map).get_mut(key),
            _ => None,
        }
    }

    /// Insert an object member. Returns false if this is not an object.
    pub fn insert(&mut self, key: impl Into<String>, value: Document) -> bool {
        match self {
            Self::Object(map) => {
                Arc::make_mut(map).insert(key.into(), value);
                true
            }
            _ => false,
        }
    }
}

// Conversion traits
impl From<Scalar> for Document {
    fn from(v: Scalar) -> Self {
        Self::Scalar(v)
    }
}

impl From<bool> for Document {
    fn from(v: bool) -> Self {
        Self::Scalar(Scalar::Bool(v))
    }
}

impl From<i32> for Document {
    fn from(v: i32) -> Self {
        Self::Scalar(Scalar::Int(i64::from(v)))
    }
}

impl From<i64> for Document {
    fn from(v: i64) -> Self {
        Self::Scalar(Scalar::Int(v))
    }
}

impl From<u32> for Document {
    fn from(v: u32) -> Self {
        Self::Scalar(Scalar::Int(i64::from(v)))
    }
}

impl From<f64> for Document {
    fn from(v: f64) -> Self {
        Self::Scalar(Scalar::Double(v))
    }
}

impl From<&str> for Document {
    fn from(v: &str) -> Self {
        Self::Scalar(Scalar::String(Arc::from(v)))
    }
}

impl From<String> for Document {
    fn from(v: String) -> Self {
        Self::Scalar(Scalar::String(Arc::from(v)))
    }
}

impl From<Arc<str>> for Document {
    fn from(v: Arc<str>) -> Self {
        Self::Scalar(Scalar::String(v))
    }
}

impl From<&[u8]> for Document {
    fn from(v: &[u8]) -> Self {
        Self::Scalar(Scalar::Binary(Arc::from(v)))
    }
}

impl<T: Into<Document>> From<Vec<T>> for Document {
    fn from(v: Vec<T>) -> Self {
        Self::Array(Arc::new(v.into_iter().map(Into::into).collect()))
    }
}

impl<T: Into<Document>> From<Option<T>> for Document {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::NULL, Into::into)
    }
}

impl From<DocumentMap> for Document {
    fn from(v: DocumentMap) -> Self {
        Self::Object(Arc::new(v))
    }
}
