// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode engine: generic document -> domain instance.
//!
//! Embedded types are chosen per element by the field's discriminator, so a
//! single list may decode into several concrete types. Decoded fields are
//! staged and only applied to the target once the whole document decoded.

use crate::config::TranscodeConfig;
use crate::container::{self, ContainerKind};
use crate::document::Document;
use crate::error::{Result, TranscodeError};
use crate::instance::{Instance, Value};
use crate::registry::{FieldDescriptor, FieldShape, TypeKey, TypeRegistry};

/// Recursive document walker populating instances.
pub(crate) struct Decoder<'a> {
    registry: &'a TypeRegistry,
    config: &'a TranscodeConfig,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, config: &'a TranscodeConfig) -> Self {
        Self { registry, config }
    }

    /// Decode into a fresh, default-populated instance of `key`.
    pub(crate) fn decode(&self, key: &TypeKey, document: &Document) -> Result<Instance> {
        self.check_mapped(key)?;
        let mut instance = self.registry.instantiate(key)?;
        let staged = self.decode_fields(key, key.name(), document, 0)?;
        instance.extend_fields(staged);
        Ok(instance)
    }

    /// Decode into an existing instance. Fields absent from `document` keep
    /// their current value; on error the instance is left untouched.
    pub(crate) fn decode_into(&self, instance: &mut Instance, document: &Document) -> Result<()> {
        let key = instance.type_key().clone();
        self.check_mapped(&key)?;
        let staged = self.decode_fields(&key, key.name(), document, 0)?;
        instance.extend_fields(staged);
        Ok(())
    }

    fn check_mapped(&self, key: &TypeKey) -> Result<()> {
        match self.registry.classification(key) {
            Some(_) => Ok(()),
            None => Err(TranscodeError::NotAMappedType {
                type_name: key.name().to_string(),
            }),
        }
    }

    fn decode_fields(
        &self,
        key: &TypeKey,
        label: &str,
        document: &Document,
        depth: usize,
    ) -> Result<Vec<(String, Value)>> {
        if depth > self.config.max_depth {
            return Err(TranscodeError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        let resolved = self.registry.resolve(key)?;
        let Document::Object(members) = document else {
            return Err(TranscodeError::UnexpectedValue {
                field: label.to_string(),
                expected: "object",
                found: document.kind_name(),
            });
        };

        let mut staged = Vec::with_capacity(members.len());
        for (name, raw) in members.iter() {
            let Some(field) = resolved.field(name) else {
                if self.config.log_unmapped {
                    log::debug!(
                        "[decode] ignoring unmapped key '{}' for '{}'",
                        name,
                        key.name()
                    );
                }
                continue;
            };
            let value = self.decode_field(name, field, raw, depth)?;
            staged.push((name.clone(), value));
        }
        Ok(staged)
    }

    fn decode_field(
        &self,
        name: &str,
        field: &FieldDescriptor,
        raw: &Document,
        depth: usize,
    ) -> Result<Value> {
        match field.shape() {
            FieldShape::Scalar => Ok(Value::Plain(raw.clone())),
            FieldShape::EmbedOne => self.decode_embedded(name, field, raw, depth),
            _ if raw.is_null() => Ok(Value::Plain(Document::NULL)),
            shape => {
                let Some(kind) = ContainerKind::of(shape) else {
                    return self.decode_embedded(name, field, raw, depth);
                };
                container::transcode(kind, name, raw, |slot, item| {
                    self.decode_embedded(&slot.label(name), field, item, depth)
                })
            }
        }
    }

    fn decode_embedded(
        &self,
        label: &str,
        field: &FieldDescriptor,
        raw: &Document,
        depth: usize,
    ) -> Result<Value> {
        if raw.is_null() {
            return Ok(Value::Plain(Document::NULL));
        }
        let Some(discriminator) = field.discriminator() else {
            return Ok(Value::Plain(raw.clone()));
        };

        // Selected per element: different elements may pick different types.
        let key = discriminator.select(raw);
        if !self.registry.is_embeddable(&key) {
            return Err(TranscodeError::InvalidEmbeddedType {
                field: label.to_string(),
                type_name: key.name().to_string(),
            });
        }

        let mut instance = self.registry.instantiate(&key)?;
        let staged = self.decode_fields(&key, label, raw, depth + 1)?;
        instance.extend_fields(staged);
        Ok(Value::Object(Box::new(instance)))
    }
}
