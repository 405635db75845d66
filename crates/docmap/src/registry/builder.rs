// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for type declarations.

use crate::instance::Value;
use crate::registry::{Classification, Discriminator, FieldDescriptor, TypeKey, TypeRegistry};

/// Builder collecting one type's declaration before registering it.
///
/// ```rust
/// use docmap::{TypeBuilder, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// TypeBuilder::embeddable("Address")
///     .scalar("street")
///     .scalar("city")
///     .register(&registry);
/// TypeBuilder::root("Person")
///     .scalar("name")
///     .embed_one("home", "Address")
///     .embed_list("previous", "Address")
///     .register(&registry);
///
/// assert!(registry.is_root(&"Person".into()));
/// ```
#[derive(Debug)]
pub struct TypeBuilder {
    key: TypeKey,
    classification: Classification,
    supertype: Option<TypeKey>,
    fields: Vec<(String, FieldDescriptor)>,
}

impl TypeBuilder {
    /// Start a declaration with an explicit classification.
    pub fn new(key: impl Into<TypeKey>, classification: Classification) -> Self {
        Self {
            key: key.into(),
            classification,
            supertype: None,
            fields: Vec::new(),
        }
    }

    /// Start a Root type declaration.
    pub fn root(key: impl Into<TypeKey>) -> Self {
        Self::new(key, Classification::Root)
    }

    /// Start an Embeddable type declaration.
    pub fn embeddable(key: impl Into<TypeKey>) -> Self {
        Self::new(key, Classification::Embeddable)
    }

    /// Declare the direct supertype.
    pub fn extends(mut self, parent: impl Into<TypeKey>) -> Self {
        self.supertype = Some(parent.into());
        self
    }

    /// Add a field with a descriptor.
    pub fn field(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Add a scalar field.
    pub fn scalar(self, name: impl Into<String>) -> Self {
        self.field(name, FieldDescriptor::scalar())
    }

    /// Add a scalar field with a default value.
    pub fn scalar_with_default(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.field(name, FieldDescriptor::scalar().with_default(default))
    }

    /// Add a single embedded field of a fixed type.
    pub fn embed_one(self, name: impl Into<String>, key: impl Into<TypeKey>) -> Self {
        self.field(name, FieldDescriptor::embed_one(key))
    }

    /// Add a polymorphic single embedded field.
    pub fn embed_one_with(self, name: impl Into<String>, discriminator: Discriminator) -> Self {
        self.field(name, FieldDescriptor::embed_one_with(discriminator))
    }

    /// Add an embedded list field of a fixed element type.
    pub fn embed_list(self, name: impl Into<String>, key: impl Into<TypeKey>) -> Self {
        self.field(name, FieldDescriptor::embed_list(key))
    }

    /// Add a polymorphic embedded list field.
    pub fn embed_list_with(self, name: impl Into<String>, discriminator: Discriminator) -> Self {
        self.field(name, FieldDescriptor::embed_list_with(discriminator))
    }

    /// Add an embedded keyed map field of a fixed value type.
    pub fn embed_keyed_map(self, name: impl Into<String>, key: impl Into<TypeKey>) -> Self {
        self.field(name, FieldDescriptor::embed_keyed_map(key))
    }

    /// Add a polymorphic embedded keyed map field.
    pub fn embed_keyed_map_with(
        self,
        name: impl Into<String>,
        discriminator: Discriminator,
    ) -> Self {
        self.field(name, FieldDescriptor::embed_keyed_map_with(discriminator))
    }

    /// Add an order-preserving embedded map field of a fixed value type.
    pub fn embed_ordered_map(self, name: impl Into<String>, key: impl Into<TypeKey>) -> Self {
        self.field(name, FieldDescriptor::embed_ordered_map(key))
    }

    /// Add a polymorphic order-preserving embedded map field.
    pub fn embed_ordered_map_with(
        self,
        name: impl Into<String>,
        discriminator: Discriminator,
    ) -> Self {
        self.field(name, FieldDescriptor::embed_ordered_map_with(discriminator))
    }

    /// Declare everything collected so far and return the type key.
    pub fn register(self, registry: &TypeRegistry) -> TypeKey {
        registry.declare(&self.key, self.classification);
        if let Some(parent) = self.supertype {
            registry.declare_supertype(&self.key, parent);
        }
        for (name, field) in self.fields {
            registry.declare_field(&self.key, name, field);
        }
        self.key
    }
}
