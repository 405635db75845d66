// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type and field descriptors.

use crate::document::Document;
use crate::error::Result;
use crate::instance::Value;
use crate::registry::resolve::ResolvedDescriptor;
use crate::registry::{Classification, TypeKey};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// How a declared field maps onto the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// Copied verbatim in both directions.
    Scalar,
    /// One embedded instance.
    EmbedOne,
    /// Ordered sequence of embedded instances.
    EmbedList,
    /// String-keyed embedded instances, decoded into an ordinary table.
    EmbedKeyedMap,
    /// String-keyed embedded instances, decoded into an order-preserving map.
    EmbedOrderedMap,
}

impl FieldShape {
    /// Check if the shape embeds mapped instances.
    pub fn is_embedded(self) -> bool {
        !matches!(self, Self::Scalar)
    }

    /// Check if the shape holds many embedded instances.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Self::EmbedList | Self::EmbedKeyedMap | Self::EmbedOrderedMap
        )
    }
}

/// Type name returned by [`Discriminator::by_field`] when nothing matches.
pub const UNRESOLVED_TYPE: &str = "<unresolved>";

/// Picks the concrete embeddable type for one raw embedded value.
///
/// Called once per element or entry during decode, never cached, so
/// different elements may resolve to different types. Must be pure.
#[derive(Clone)]
pub struct Discriminator(Arc<dyn Fn(&Document) -> TypeKey + Send + Sync>);

impl Discriminator {
    /// Wrap an arbitrary selection function.
    pub fn new<F>(select: F) -> Self
    where
        F: Fn(&Document) -> TypeKey + Send + Sync + 'static,
    {
        Self(Arc::new(select))
    }

    /// Always select the same type.
    pub fn fixed(key: impl Into<TypeKey>) -> Self {
        let key = key.into();
        Self::new(move |_| key.clone())
    }

    /// Select by a string tag stored in `tag_field` of the raw object.
    ///
    /// A tag listed in `cases` maps to its type. An unlisted tag falls back to
    /// `fallback`, or to the type named by the tag itself. A missing tag uses
    /// `fallback`, or [`UNRESOLVED_TYPE`].
    pub fn by_field<I, K, T>(tag_field: impl Into<String>, cases: I, fallback: Option<TypeKey>) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<TypeKey>,
    {
        let tag_field = tag_field.into();
        let cases: HashMap<String, TypeKey> = cases
            .into_iter()
            .map(|(tag, key)| (tag.into(), key.into()))
            .collect();
        Self::new(move |raw| match raw.get(&tag_field).and_then(Document::as_str) {
            Some(tag) => cases
                .get(tag)
                .or(fallback.as_ref())
                .cloned()
                .unwrap_or_else(|| TypeKey::new(tag)),
            None => fallback
                .clone()
                .unwrap_or_else(|| TypeKey::new(UNRESOLVED_TYPE)),
        })
    }

    /// Run the selection for one raw value.
    pub fn select(&self, raw: &Document) -> TypeKey {
        (self.0)(raw)
    }
}

impl fmt::Debug for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Discriminator(..)")
    }
}

/// Mapping rule for one declared field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    shape: FieldShape,
    discriminator: Option<Discriminator>,
    default: Option<Value>,
}

impl FieldDescriptor {
    /// Plain field copied verbatim.
    pub fn scalar() -> Self {
        Self {
            shape: FieldShape::Scalar,
            discriminator: None,
            default: None,
        }
    }

    /// Embedded field of the given shape. A discriminator passed with
    /// [`FieldShape::Scalar`] is ignored.
    pub fn embedded(shape: FieldShape, discriminator: Discriminator) -> Self {
        Self {
            shape,
            discriminator: shape.is_embedded().then_some(discriminator),
            default: None,
        }
    }

    /// One embedded instance of a fixed type.
    pub fn embed_one(key: impl Into<TypeKey>) -> Self {
        Self::embedded(FieldShape::EmbedOne, Discriminator::fixed(key))
    }

    /// One polymorphic embedded instance.
    pub fn embed_one_with(discriminator: Discriminator) -> Self {
        Self::embedded(FieldShape::EmbedOne, discriminator)
    }

    /// List of embedded instances of a fixed type.
    pub fn embed_list(key: impl Into<TypeKey>) -> Self {
        Self::embedded(FieldShape::EmbedList, Discriminator::fixed(key))
    }

    /// List of polymorphic embedded instances.
    pub fn embed_list_with(discriminator: Discriminator) -> Self {
        Self::embedded(FieldShape::EmbedList, discriminator)
    }

    /// Keyed map of embedded instances of a fixed type.
    pub fn embed_keyed_map(key: impl Into<TypeKey>) -> Self {
        Self::embedded(FieldShape::EmbedKeyedMap, Discriminator::fixed(key))
    }

    /// Keyed map of polymorphic embedded instances.
    pub fn embed_keyed_map_with(discriminator: Discriminator) -> Self {
        Self::embedded(FieldShape::EmbedKeyedMap, discriminator)
    }

    /// Order-preserving map of embedded instances of a fixed type.
    pub fn embed_ordered_map(key: impl Into<TypeKey>) -> Self {
        Self::embedded(FieldShape::EmbedOrderedMap, Discriminator::fixed(key))
    }

    /// Order-preserving map of polymorphic embedded instances.
    pub fn embed_ordered_map_with(discriminator: Discriminator) -> Self {
        Self::embedded(FieldShape::EmbedOrderedMap, discriminator)
    }

    /// Set the value a freshly instantiated instance starts with.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Field shape.
    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    /// Discriminator, present for every embedded shape.
    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    /// Default value, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Registry entry for one mapped type.
///
/// Classification, own fields and the parent link may change during
/// declaration; the flattened view is computed once and then frozen.
pub struct TypeDescriptor {
    key: TypeKey,
    classification: RwLock<Option<Classification>>,
    fields: RwLock<BTreeMap<String, FieldDescriptor>>,
    parent: RwLock<Option<Arc<TypeDescriptor>>>,
    pub(crate) resolved: OnceLock<Result<Arc<ResolvedDescriptor>>>,
}

impl TypeDescriptor {
    pub(crate) fn new(key: TypeKey) -> Self {
        Self {
            key,
            classification: RwLock::new(None),
            fields: RwLock::new(BTreeMap::new()),
            parent: RwLock::new(None),
            resolved: OnceLock::new(),
        }
    }

    /// Type identity.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Declared type name.
    pub fn name(&self) -> &str {
        self.key.name()
    }

    /// Classification, `None` until the type is declared.
    pub fn classification(&self) -> Option<Classification> {
        *self.classification.read()
    }

    /// Check if the type is declared Root.
    pub fn is_root(&self) -> bool {
        self.classification() == Some(Classification::Root)
    }

    /// Check if the type is declared Embeddable.
    pub fn is_embeddable(&self) -> bool {
        self.classification() == Some(Classification::Embeddable)
    }

    /// Check if the inherited fields have been flattened.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Current parent link (as of the last registry lookup).
    pub fn parent(&self) -> Option<Arc<TypeDescriptor>> {
        self.parent.read().clone()
    }

    /// One of the type's own (non-inherited) field declarations.
    pub fn own_field(&self, name: &str) -> Option<FieldDescriptor> {
        self.fields.read().get(name).cloned()
    }

    /// Names of the type's own fields, sorted.
    pub fn own_field_names(&self) -> Vec<String> {
        self.fields.read().keys().cloned().collect()
    }

    pub(crate) fn own_fields(&self) -> BTreeMap<String, FieldDescriptor> {
        self.fields.read().clone()
    }

    pub(crate) fn set_classification(&self, classification: Classification) {
        *self.classification.write() = Some(classification);
    }

    pub(crate) fn insert_field(&self, name: String, field: FieldDescriptor) {
        self.fields.write().insert(name, field);
    }

    pub(crate) fn set_parent(&self, parent: Option<Arc<TypeDescriptor>>) {
        *self.parent.write() = parent;
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key)
            .field("classification", &self.classification())
            .field("fields", &self.own_field_names())
            .field("parent", &self.parent().map(|p| p.key().clone()))
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
