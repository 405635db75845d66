// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode engine: domain instance -> generic document.

use crate::config::TranscodeConfig;
use crate::container::{self, ContainerKind};
use crate::document::{Document, DocumentMap};
use crate::error::{Result, TranscodeError};
use crate::instance::{Instance, Value};
use crate::registry::{Classification, FieldDescriptor, FieldShape, TypeRegistry};

/// Recursive instance walker producing a document tree.
pub(crate) struct Encoder<'a> {
    registry: &'a TypeRegistry,
    config: &'a TranscodeConfig,
}

impl<'a> Encoder<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, config: &'a TranscodeConfig) -> Self {
        Self { registry, config }
    }

    /// Encode a top-level instance of a Root or Embeddable type.
    pub(crate) fn encode(&self, instance: &Instance) -> Result<Document> {
        if self.registry.classification(instance.type_key()).is_none() {
            return Err(TranscodeError::NotAMappedType {
                type_name: instance.type_name().to_string(),
            });
        }
        self.encode_instance(instance, 0)
    }

    fn encode_instance(&self, instance: &Instance, depth: usize) -> Result<Document> {
        if depth > self.config.max_depth {
            return Err(TranscodeError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        let resolved = self.registry.resolve(instance.type_key())?;

        let mut out = DocumentMap::with_capacity(instance.len());
        for (name, value) in instance.fields() {
            let Some(field) = resolved.field(name) else {
                // Dropping is only allowed for data that could never have
                // been a document of its own.
                if let Some(root) = self.find_root(value) {
                    return Err(TranscodeError::CrossDocumentReference {
                        field: name.to_string(),
                        type_name: root.type_name().to_string(),
                    });
                }
                if self.config.log_unmapped {
                    log::debug!(
                        "[encode] dropping unmapped field '{}' of '{}'",
                        name,
                        instance.type_name()
                    );
                }
                continue;
            };
            let encoded = self.encode_field(name, field, value, depth)?;
            out.insert(name.to_string(), encoded);
        }
        Ok(Document::from(out))
    }

    fn encode_field(
        &self,
        name: &str,
        field: &FieldDescriptor,
        value: &Value,
        depth: usize,
    ) -> Result<Document> {
        match field.shape() {
            FieldShape::Scalar => self.encode_scalar(name, value),
            FieldShape::EmbedOne => self.encode_embedded(name, value, depth),
            _ if value.is_null() => Ok(Document::NULL),
            shape => {
                let Some(kind) = ContainerKind::of(shape) else {
                    return self.encode_embedded(name, value, depth);
                };
                container::transcode(kind, name, value, |slot, item| {
                    self.encode_embedded(&slot.label(name), item, depth)
                })
            }
        }
    }

    fn encode_scalar(&self, name: &str, value: &Value) -> Result<Document> {
        match value {
            Value::Plain(doc) => Ok(doc.clone()),
            other => match self.find_root(other) {
                Some(root) => Err(TranscodeError::CrossDocumentReference {
                    field: name.to_string(),
                    type_name: root.type_name().to_string(),
                }),
                None => Err(TranscodeError::UnexpectedValue {
                    field: name.to_string(),
                    expected: "plain value",
                    found: other.kind_name(),
                }),
            },
        }
    }

    fn encode_embedded(&self, label: &str, value: &Value, depth: usize) -> Result<Document> {
        match value {
            Value::Plain(doc) if doc.is_null() => Ok(Document::NULL),
            Value::Object(instance) => match self.registry.classification(instance.type_key()) {
                Some(Classification::Embeddable) => self.encode_instance(instance, depth + 1),
                Some(Classification::Root) => Err(TranscodeError::CrossDocumentReference {
                    field: label.to_string(),
                    type_name: instance.type_name().to_string(),
                }),
                None => Err(TranscodeError::NotAMappedType {
                    type_name: instance.type_name().to_string(),
                }),
            },
            other => Err(TranscodeError::UnexpectedValue {
                field: label.to_string(),
                expected: "embedded instance",
                found: other.kind_name(),
            }),
        }
    }

    /// First Root-classified instance nested anywhere inside `value`.
    fn find_root<'v>(&self, value: &'v Value) -> Option<&'v Instance> {
        match value {
            Value::Plain(_) => None,
            Value::Object(instance) => {
                if self.registry.is_root(instance.type_key()) {
                    Some(&**instance)
                } else {
                    instance.fields().find_map(|(_, v)| self.find_root(v))
                }
            }
            Value::List(items) => items.iter().find_map(|v| self.find_root(v)),
            Value::Table(table) => table.values().find_map(|v| self.find_root(v)),
            Value::Ordered(map) => map.values().find_map(|v| self.find_root(v)),
        }
    }
}
