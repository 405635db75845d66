// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry.
//!
//! Process-wide table from type identity to [`TypeDescriptor`]. Types are
//! declared up front (directly, through [`TypeBuilder`], or from a declarative
//! schema) and are read-only afterwards, apart from the one-time flattening of
//! inherited fields.
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry
//! +-- types: DashMap<TypeKey, Arc<TypeDescriptor>>
//! +-- supertypes: StaticHierarchy        (declare_supertype)
//! +-- host: Option<Arc<dyn TypeHierarchy>>
//!
//! TypeDescriptor (one per type, never removed)
//! +-- classification: RwLock<Option<Classification>>
//! +-- fields: RwLock<BTreeMap<String, FieldDescriptor>>   (own fields)
//! +-- parent: RwLock<Option<Arc<TypeDescriptor>>>         (relinked on lookup)
//! +-- resolved: OnceLock<Result<Arc<ResolvedDescriptor>>> (flattened once)
//! ```

mod builder;
mod descriptor;
mod resolve;

pub use builder::TypeBuilder;
pub use descriptor::{Discriminator, FieldDescriptor, FieldShape, TypeDescriptor, UNRESOLVED_TYPE};
pub use resolve::ResolvedDescriptor;

use crate::error::{Result, TranscodeError};
use dashmap::DashMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Identity of a mapped type: its declared name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Arc<str>);

impl TypeKey {
    /// Create a key from a type name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.0)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for TypeKey {
    fn from(v: String) -> Self {
        Self::new(v)
    }
}

impl From<&TypeKey> for TypeKey {
    fn from(v: &TypeKey) -> Self {
        v.clone()
    }
}

/// Whether a mapped type stands alone or only nests inside another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// May be persisted as a top-level document.
    Root,
    /// May only appear nested inside another mapped type.
    Embeddable,
}

/// Supertype information supplied by the host type system.
pub trait TypeHierarchy: Send + Sync {
    /// Immediate supertype of `key`, if any.
    fn supertype(&self, key: &TypeKey) -> Option<TypeKey>;
}

/// [`DashMap`]-backed [`TypeHierarchy`] fed by explicit declarations.
#[derive(Debug, Default)]
pub struct StaticHierarchy {
    parents: DashMap<TypeKey, TypeKey>,
}

impl StaticHierarchy {
    /// Create an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `child` directly extends `parent`.
    pub fn declare(&self, child: TypeKey, parent: TypeKey) {
        self.parents.insert(child, parent);
    }
}

impl TypeHierarchy for StaticHierarchy {
    fn supertype(&self, key: &TypeKey) -> Option<TypeKey> {
        self.parents.get(key).map(|p| p.value().clone())
    }
}

/// Table of mapped types.
pub struct TypeRegistry {
    types: DashMap<TypeKey, Arc<TypeDescriptor>>,
    supertypes: StaticHierarchy,
    host: Option<Arc<dyn TypeHierarchy>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
            supertypes: StaticHierarchy::new(),
            host: None,
        }
    }

    /// Create a registry that asks `host` for supertypes first, falling back
    /// to [`declare_supertype`](Self::declare_supertype) declarations.
    #[must_use]
    pub fn with_hierarchy(host: Arc<dyn TypeHierarchy>) -> Self {
        Self {
            host: Some(host),
            ..Self::new()
        }
    }

    /// Register a type, or change the classification of an existing one.
    pub fn declare(&self, key: impl Into<TypeKey>, classification: Classification) {
        let desc = self.entry(&key.into());
        if let Some(previous) = desc.classification() {
            if previous != classification {
                log::debug!(
                    "[registry] '{}' reclassified {:?} -> {:?}",
                    desc.name(),
                    previous,
                    classification
                );
            }
        } else {
            log::debug!("[registry] declared '{}' as {:?}", desc.name(), classification);
        }
        desc.set_classification(classification);
    }

    /// Insert or overwrite one of a type's own field declarations.
    ///
    /// May be called before [`declare`](Self::declare).
    pub fn declare_field(
        &self,
        key: impl Into<TypeKey>,
        name: impl Into<String>,
        field: FieldDescriptor,
    ) {
        let desc = self.entry(&key.into());
        let name = name.into();
        if desc.is_resolved() {
            log::warn!(
                "[registry] field '{}' declared on '{}' after resolution; it will not be seen",
                name,
                desc.name()
            );
        }
        desc.insert_field(name, field);
    }

    /// Record that `child` directly extends `parent`.
    pub fn declare_supertype(&self, child: impl Into<TypeKey>, parent: impl Into<TypeKey>) {
        self.supertypes.declare(child.into(), parent.into());
    }

    /// Raw (possibly unresolved) descriptor, with its parent chain relinked.
    pub fn lookup(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
        let desc = self.types.get(key).map(|e| Arc::clone(e.value()))?;
        self.relink(&desc);
        Some(desc)
    }

    /// Check if `key` is declared Root.
    pub fn is_root(&self, key: &TypeKey) -> bool {
        self.types.get(key).is_some_and(|d| d.is_root())
    }

    /// Check if `key` is declared Embeddable.
    pub fn is_embeddable(&self, key: &TypeKey) -> bool {
        self.types.get(key).is_some_and(|d| d.is_embeddable())
    }

    /// Classification of `key`, `None` if never declared.
    pub fn classification(&self, key: &TypeKey) -> Option<Classification> {
        self.types.get(key).and_then(|d| d.classification())
    }

    /// Flattened descriptor of a declared (Root or Embeddable) type.
    pub fn resolve(&self, key: &TypeKey) -> Result<Arc<ResolvedDescriptor>> {
        let desc = self.lookup(key).ok_or_else(|| TranscodeError::NotAMappedType {
            type_name: key.name().to_string(),
        })?;
        resolve::resolve(self, &desc)
    }

    /// Fresh instance of `key` holding every declared field default.
    pub fn instantiate(&self, key: &TypeKey) -> Result<crate::Instance> {
        let resolved = self.resolve(key)?;
        let mut instance = crate::Instance::new(key.clone());
        instance.extend_fields(resolved.fields().filter_map(|(name, field)| {
            field
                .default_value()
                .map(|default| (name.to_string(), default.clone()))
        }));
        Ok(instance)
    }

    /// Every type with a registry entry, sorted by name.
    pub fn types(&self) -> Vec<TypeKey> {
        let mut keys: Vec<TypeKey> = self.types.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Number of registry entries.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn supertype(&self, key: &TypeKey) -> Option<TypeKey> {
        self.host
            .as_ref()
            .and_then(|h| h.supertype(key))
            .or_else(|| self.supertypes.supertype(key))
    }

    fn entry(&self, key: &TypeKey) -> Arc<TypeDescriptor> {
        Arc::clone(
            self.types
                .entry(key.clone())
                .or_insert_with(|| Arc::new(TypeDescriptor::new(key.clone())))
                .value(),
        )
    }

    /// Recompute the parent links from `desc` up its supertype chain.
    ///
    /// The chain ends at the first supertype with no registry entry: an
    /// unmapped base type contributes nothing. A supertype that has an entry
    /// but no classification stays linked, so resolution reports it. Stops
    /// when the chain revisits a type. Never inserts entries.
    pub(crate) fn relink(&self, desc: &Arc<TypeDescriptor>) {
        let mut seen = HashSet::new();
        let mut current = Arc::clone(desc);
        while seen.insert(current.key().clone()) {
            let parent = self
                .supertype(current.key())
                .and_then(|p| self.types.get(&p).map(|e| Arc::clone(e.value())));
            current.set_parent(parent.clone());
            match parent {
                Some(p) => current = p,
                None => break,
            }
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types())
            .field("host_hierarchy", &self.host.is_some())
            .finish()
    }
}

static GLOBAL_REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

/// The process-wide registry.
pub fn registry() -> &'static TypeRegistry {
    GLOBAL_REGISTRY.get_or_init(TypeRegistry::new)
}
