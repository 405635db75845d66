// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # docmap - schema-driven document transcoding
//!
//! Converts domain instances to and from a generic document tree, driven by a
//! runtime registry of type descriptors instead of compile-time derives.
//!
//! ## Quick Start
//!
//! ```rust
//! use docmap::{Document, Instance, Transcoder, TypeBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! TypeBuilder::embeddable("Address").scalar("city").register(&registry);
//! TypeBuilder::root("Person")
//!     .scalar("name")
//!     .embed_one("home", "Address")
//!     .register(&registry);
//!
//! let person = Instance::new("Person")
//!     .with_plain("name", "Ada")
//!     .with("home", Instance::new("Address").with_plain("city", "London"));
//!
//! let transcoder = Transcoder::new(&registry);
//! let doc = transcoder.encode(&person).unwrap();
//! assert_eq!(doc.get("name").and_then(Document::as_str), Some("Ada"));
//!
//! let back = transcoder.decode("Person", &doc).unwrap();
//! assert_eq!(back, person);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |            Transcoder (encode / decode / decode_into)         |
//! +-------------------------------+-------------------------------+
//! |         Encode engine         |         Decode engine         |
//! |  Instance -> Document         |  Document -> Instance         |
//! |                               |  (per-element discriminator)  |
//! +-------------------------------+-------------------------------+
//! |     Container adapter (list | keyed map | ordered map)        |
//! +---------------------------------------------------------------+
//! |  Type registry + resolver (inheritance flattening, frozen)    |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeRegistry`] | Declared types, classification, supertypes and fields |
//! | [`TypeBuilder`] | Fluent declaration of one type |
//! | [`Instance`] | Dynamic domain object |
//! | [`Document`] | Generic document tree |
//! | [`Transcoder`] | Encode/decode front-end |
//!
//! ## Features
//!
//! - `json` (default): conversions between [`Document`] and `serde_json::Value`
//! - `schema-loaders` (default): declare types from YAML or JSON schemas

/// Runtime configuration (depth limit, unmapped-field logging).
pub mod config;
mod container;
mod decode;
/// Generic document tree.
pub mod document;
mod encode;
/// Transcoding errors.
pub mod error;
/// Dynamic domain instances.
pub mod instance;
#[cfg(feature = "json")]
mod json;
/// Type registry, descriptors and inheritance resolution.
pub mod registry;
/// Declarative YAML/JSON schema loading.
#[cfg(feature = "schema-loaders")]
pub mod schema;
mod transcoder;

pub use config::TranscodeConfig;
pub use document::{Document, DocumentMap, Scalar};
pub use error::{Result, TranscodeError};
pub use instance::{Instance, Value};
pub use registry::{
    registry, Classification, Discriminator, FieldDescriptor, FieldShape, ResolvedDescriptor,
    StaticHierarchy, TypeBuilder, TypeDescriptor, TypeHierarchy, TypeKey, TypeRegistry,
    UNRESOLVED_TYPE,
};
#[cfg(feature = "schema-loaders")]
pub use schema::{Schema, SchemaLoader};
pub use transcoder::{decode, decode_into, encode, Transcoder};

#[cfg(test)]
mod tests;
