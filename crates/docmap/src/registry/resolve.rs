// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor flattening.
//!
//! Merges inherited field declarations into a derived type's field map, once.
//! The walk goes outward from the most derived type and the first declaration
//! of a name wins, so a descendant always overrides its ancestors.
//!
//! The result (or the failure) is stored in the descriptor's `OnceLock`:
//! concurrent first users either run the flattening or wait for it, and never
//! observe a half-merged map.

use crate::error::{Result, TranscodeError};
use crate::registry::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::registry::{Classification, TypeKey, TypeRegistry};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Flattened, frozen view of a mapped type.
#[derive(Debug)]
pub struct ResolvedDescriptor {
    key: TypeKey,
    classification: Classification,
    fields: BTreeMap<String, FieldDescriptor>,
    ancestors: Vec<TypeKey>,
}

impl ResolvedDescriptor {
    /// Type identity.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// Classification at resolution time.
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Look up a field, own or inherited.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// All fields, sorted by name.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields after flattening.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Ancestors, nearest first.
    pub fn ancestors(&self) -> &[TypeKey] {
        &self.ancestors
    }
}

/// Resolve a descriptor, flattening its inherited fields on first use.
///
/// A hierarchy failure is cached with the descriptor: once a type fails to
/// resolve it keeps failing with the same error.
pub fn resolve(
    registry: &TypeRegistry,
    descriptor: &Arc<TypeDescriptor>,
) -> Result<Arc<ResolvedDescriptor>> {
    if let Some(done) = descriptor.resolved.get() {
        return done.clone();
    }
    let Some(classification) = descriptor.classification() else {
        return Err(TranscodeError::NotAMappedType {
            type_name: descriptor.name().to_string(),
        });
    };
    descriptor
        .resolved
        .get_or_init(|| flatten(registry, descriptor, classification))
        .clone()
}

fn flatten(
    registry: &TypeRegistry,
    descriptor: &Arc<TypeDescriptor>,
    classification: Classification,
) -> Result<Arc<ResolvedDescriptor>> {
    registry.relink(descriptor);

    let mut fields = descriptor.own_fields();
    let own_count = fields.len();
    let mut ancestors = Vec::new();
    let mut seen = HashSet::from([descriptor.key().clone()]);
    let mut current = descriptor.parent();

    while let Some(ancestor) = current {
        if !seen.insert(ancestor.key().clone()) {
            log::warn!(
                "[resolve] supertype chain of '{}' loops at '{}'",
                descriptor.name(),
                ancestor.name()
            );
            return Err(TranscodeError::InheritanceCycle {
                type_name: descriptor.name().to_string(),
            });
        }
        if ancestor.classification() != Some(classification) {
            log::warn!(
                "[resolve] '{}' is {:?} but ancestor '{}' is {:?}",
                descriptor.name(),
                classification,
                ancestor.name(),
                ancestor.classification()
            );
            return Err(TranscodeError::TypeHierarchyMismatch {
                descendant: descriptor.name().to_string(),
                ancestor: ancestor.name().to_string(),
            });
        }
        for (name, field) in ancestor.own_fields() {
            fields.entry(name).or_insert(field);
        }
        ancestors.push(ancestor.key().clone());
        current = ancestor.parent();
    }

    log::debug!(
        "[resolve] flattened '{}': {} own + {} inherited fields from {} ancestor(s)",
        descriptor.name(),
        own_count,
        fields.len() - own_count,
        ancestors.len()
    );

    Ok(Arc::new(ResolvedDescriptor {
        key: descriptor.key().clone(),
        classification,
        fields,
        ancestors,
    }))
}
