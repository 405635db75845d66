// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Domain-side instances.
//!
//! An [`Instance`] is a typed record: a [`TypeKey`] naming its mapped type and
//! the fields the instance actually carries. Fields are kept in insertion
//! order, and only fields present here are visited by the encoder.

use crate::document::Document;
use crate::registry::TypeKey;
use indexmap::IndexMap;
use std::collections::HashMap;

/// A field value held by an [`Instance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain document data, carried verbatim by `Scalar` fields.
    Plain(Document),
    /// A single embedded instance.
    Object(Box<Instance>),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Ordinary string-keyed table (no ordering guarantee).
    Table(HashMap<String, Value>),
    /// Order-preserving string-keyed map.
    Ordered(IndexMap<String, Value>),
}

impl Value {
    /// Short description of the value kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Plain(_) => "plain value",
            Self::Object(_) => "embedded instance",
            Self::List(_) => "list",
            Self::Table(_) => "table",
            Self::Ordered(_) => "ordered map",
        }
    }

    /// Check if the value is plain null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Plain(d) if d.is_null())
    }

    /// Try to get as plain document data.
    pub fn as_plain(&self) -> Option<&Document> {
        match self {
            Self::Plain(d) => Some(d),
            _ => None,
        }
    }

    /// Try to get as embedded instance.
    pub fn as_object(&self) -> Option<&Instance> {
        match self {
            Self::Object(inst) => Some(inst),
            _ => None,
        }
    }

    /// Try to get as list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as table.
    pub fn as_table(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Table(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as ordered map.
    pub fn as_ordered(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Ordered(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Self::Plain(v)
    }
}

impl From<Instance> for Value {
    fn from(v: Instance) -> Self {
        Self::Object(Box::new(v))
    }
}

impl From<Vec<Instance>> for Value {
    fn from(v: Vec<Instance>) -> Self {
        Self::List(v.into_iter().map(Value::from).collect())
    }
}

/// A domain object of some mapped type.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    type_key: TypeKey,
    fields: IndexMap<String, Value>,
}

impl Instance {
    /// Create an instance with no fields set.
    ///
    /// Use [`TypeRegistry::instantiate`](crate::TypeRegistry::instantiate) to
    /// get one pre-populated with declared defaults.
    pub fn new(type_key: impl Into<TypeKey>) -> Self {
        Self {
            type_key: type_key.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builder-style plain field setter.
    pub fn with_plain(self, name: impl Into<String>, value: impl Into<Document>) -> Self {
        self.with(name, Value::Plain(value.into()))
    }

    /// The instance's type.
    pub fn type_key(&self) -> &TypeKey {
        &self.type_key
    }

    /// The instance's type name.
    pub fn type_name(&self) -> &str {
        self.type_key.name()
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get mutable field by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Get a field's plain document data.
    pub fn get_plain(&self, name: &str) -> Option<&Document> {
        self.get(name)?.as_plain()
    }

    /// Get a field's plain string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get_plain(name)?.as_str()
    }

    /// Get a field's plain integer.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get_plain(name)?.as_i64()
    }

    /// Get a field's embedded instance.
    pub fn get_object(&self, name: &str) -> Option<&Instance> {
        self.get(name)?.as_object()
    }

    /// Get a field's list.
    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        self.get(name)?.as_list()
    }

    /// Set a field value, returning the previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    /// Remove a field, keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    /// Check whether the instance carries a field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate over carried fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of carried fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn extend_fields<I: IntoIterator<Item = (String, Value)>>(&mut self, fields: I) {
        self.fields.extend(fields);
    }
}
