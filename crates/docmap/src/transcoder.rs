// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Engine entry points.

use crate::config::TranscodeConfig;
use crate::decode::Decoder;
use crate::document::Document;
use crate::encode::Encoder;
use crate::error::Result;
use crate::instance::Instance;
use crate::registry::{registry, TypeKey, TypeRegistry};

/// Encode/decode front-end bound to one registry and one configuration.
///
/// Holds no mutable state: a single `Transcoder` may serve concurrent calls
/// once every type it touches has been declared.
#[derive(Debug, Clone)]
pub struct Transcoder<'r> {
    registry: &'r TypeRegistry,
    config: TranscodeConfig,
}

impl<'r> Transcoder<'r> {
    /// Create a transcoder with the default configuration.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_config(registry, TranscodeConfig::default())
    }

    /// Create a transcoder with an explicit configuration.
    pub fn with_config(registry: &'r TypeRegistry, config: TranscodeConfig) -> Self {
        Self { registry, config }
    }

    /// The registry this transcoder reads.
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Active configuration.
    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    /// Encode an instance of a Root or Embeddable type into a document.
    pub fn encode(&self, instance: &Instance) -> Result<Document> {
        Encoder::new(self.registry, &self.config).encode(instance)
    }

    /// Decode a document into a new instance of `key`.
    pub fn decode(&self, key: impl Into<TypeKey>, document: &Document) -> Result<Instance> {
        Decoder::new(self.registry, &self.config).decode(&key.into(), document)
    }

    /// Decode a document into an existing instance, in place.
    pub fn decode_into(&self, instance: &mut Instance, document: &Document) -> Result<()> {
        Decoder::new(self.registry, &self.config).decode_into(instance, document)
    }
}

/// Encode with the process-wide registry and default configuration.
pub fn encode(instance: &Instance) -> Result<Document> {
    Transcoder::new(registry()).encode(instance)
}

/// Decode with the process-wide registry and default configuration.
pub fn decode(key: impl Into<TypeKey>, document: &Document) -> Result<Instance> {
    Transcoder::new(registry()).decode(key, document)
}

/// Decode in place with the process-wide registry and default configuration.
pub fn decode_into(instance: &mut Instance, document: &Document) -> Result<()> {
    Transcoder::new(registry()).decode_into(instance, document)
}
