// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative schema loader.
//!
//! Declares mapped types from a YAML or JSON document instead of code.
//!
//! # Example YAML
//!
//! ```yaml
//! types:
//!   Animal:
//!     kind: embeddable
//!     fields:
//!       name: scalar
//!   Cat:
//!     kind: embeddable
//!     extends: Animal
//!     fields:
//!       lives: { shape: scalar, default: 9 }
//!   Owner:
//!     kind: root
//!     fields:
//!       name: scalar
//!       home: { shape: embed_one, type: Address }
//!       pets:
//!         shape: embed_list
//!         discriminator:
//!           field: type
//!           cases: { cat: Cat, dog: Dog }
//!           default: Animal
//! ```

use crate::document::Document;
use crate::error::{Result, TranscodeError};
use crate::instance::Value;
use crate::registry::{
    Classification, Discriminator, FieldDescriptor, FieldShape, TypeBuilder, TypeKey, TypeRegistry,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Root schema document.
#[derive(Debug, Deserialize)]
pub struct SchemaDocument {
    /// Declared types by name.
    #[serde(default)]
    pub types: BTreeMap<String, TypeSchema>,
}

/// Classification as written in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindSchema {
    Root,
    Embeddable,
}

impl From<KindSchema> for Classification {
    fn from(kind: KindSchema) -> Self {
        match kind {
            KindSchema::Root => Classification::Root,
            KindSchema::Embeddable => Classification::Embeddable,
        }
    }
}

/// One type declaration.
#[derive(Debug, Deserialize)]
pub struct TypeSchema {
    pub kind: KindSchema,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSchema>,
}

/// A field: either a bare shape name or a full specification.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FieldSchema {
    Shape(String),
    Spec(FieldSpec),
}

/// Full field specification.
#[derive(Debug, Deserialize)]
pub struct FieldSpec {
    #[serde(default = "default_shape")]
    pub shape: String,
    /// Fixed embedded type.
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    /// Polymorphic embedded type selection.
    #[serde(default)]
    pub discriminator: Option<DiscriminatorSpec>,
    /// Value of the field on freshly instantiated instances.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

fn default_shape() -> String {
    "scalar".to_string()
}

/// Tag-based discriminator specification.
#[derive(Debug, Deserialize)]
pub struct DiscriminatorSpec {
    /// Member of the raw embedded object holding the tag.
    pub field: String,
    /// Tag value -> type name.
    #[serde(default)]
    pub cases: BTreeMap<String, String>,
    /// Type used when the tag is missing or not listed.
    #[serde(default)]
    pub default: Option<String>,
}

fn parse_shape(type_name: &str, field: &str, shape: &str) -> Result<FieldShape> {
    match shape {
        "scalar" => Ok(FieldShape::Scalar),
        "embed_one" => Ok(FieldShape::EmbedOne),
        "embed_list" => Ok(FieldShape::EmbedList),
        "embed_keyed_map" => Ok(FieldShape::EmbedKeyedMap),
        "embed_ordered_map" => Ok(FieldShape::EmbedOrderedMap),
        other => Err(TranscodeError::Schema(format!(
            "{}.{}: unknown shape '{}'",
            type_name, field, other
        ))),
    }
}

impl FieldSchema {
    fn to_descriptor(&self, type_name: &str, field: &str) -> Result<FieldDescriptor> {
        let spec = match self {
            Self::Shape(shape) => {
                return match parse_shape(type_name, field, shape)? {
                    FieldShape::Scalar => Ok(FieldDescriptor::scalar()),
                    _ => Err(TranscodeError::Schema(format!(
                        "{}.{}: embedded shape '{}' needs a type or discriminator",
                        type_name, field, shape
                    ))),
                };
            }
            Self::Spec(spec) => spec,
        };

        let shape = parse_shape(type_name, field, &spec.shape)?;
        let descriptor = match (shape, &spec.type_name, &spec.discriminator) {
            (FieldShape::Scalar, None, None) => FieldDescriptor::scalar(),
            (FieldShape::Scalar, _, _) => {
                return Err(TranscodeError::Schema(format!(
                    "{}.{}: scalar fields take no type or discriminator",
                    type_name, field
                )));
            }
            (shape, Some(fixed), None) => {
                FieldDescriptor::embedded(shape, Discriminator::fixed(fixed.as_str()))
            }
            (shape, None, Some(disc)) => FieldDescriptor::embedded(
                shape,
                Discriminator::by_field(
                    disc.field.as_str(),
                    disc.cases
                        .iter()
                        .map(|(tag, ty)| (tag.clone(), TypeKey::new(ty.as_str()))),
                    disc.default.as_deref().map(TypeKey::new),
                ),
            ),
            (_, Some(_), Some(_)) => {
                return Err(TranscodeError::Schema(format!(
                    "{}.{}: give either a type or a discriminator, not both",
                    type_name, field
                )));
            }
            (_, None, None) => {
                return Err(TranscodeError::Schema(format!(
                    "{}.{}: embedded field needs a type or discriminator",
                    type_name, field
                )));
            }
        };

        Ok(match &spec.default {
            // Embedded slots hold instances; the only plain value they accept is null.
            Some(json) if shape.is_embedded() && !json.is_null() => {
                return Err(TranscodeError::Schema(format!(
                    "{}.{}: embedded fields only accept a null default",
                    type_name, field
                )));
            }
            Some(json) => descriptor.with_default(Value::Plain(Document::from(json.clone()))),
            None => descriptor,
        })
    }
}

/// A parsed schema, ready to be registered.
#[derive(Debug)]
pub struct Schema {
    document: SchemaDocument,
}

impl Schema {
    /// Parsed schema document.
    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    /// Declare every type of the schema.
    ///
    /// All field declarations are validated before anything is registered, so
    /// an invalid schema leaves the registry unchanged.
    pub fn register(&self, registry: &TypeRegistry) -> Result<Vec<TypeKey>> {
        let mut builders = Vec::with_capacity(self.document.types.len());
        for (name, ty) in &self.document.types {
            let mut builder = TypeBuilder::new(name.as_str(), ty.kind.into());
            if let Some(parent) = &ty.extends {
                builder = builder.extends(parent.as_str());
            }
            for (field, schema) in &ty.fields {
                builder = builder.field(field.as_str(), schema.to_descriptor(name, field)?);
            }
            builders.push(builder);
        }

        let keys: Vec<TypeKey> = builders.into_iter().map(|b| b.register(registry)).collect();
        log::debug!("[schema] registered {} type(s)", keys.len());
        Ok(keys)
    }
}

/// Loader for declarative schemas.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Parse a YAML schema.
    pub fn from_yaml_str(yaml: &str) -> Result<Schema> {
        let document: SchemaDocument = serde_yaml::from_str(yaml)
            .map_err(|e| TranscodeError::Schema(format!("YAML parse error: {}", e)))?;
        Ok(Schema { document })
    }

    /// Parse a JSON schema.
    pub fn from_json_str(json: &str) -> Result<Schema> {
        let document: SchemaDocument = serde_json::from_str(json)
            .map_err(|e| TranscodeError::Schema(format!("JSON parse error: {}", e)))?;
        Ok(Schema { document })
    }

    /// Load a schema file; the extension picks the format (`.json`, else YAML).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Schema> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TranscodeError::Schema(format!("failed to read {}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }
}
