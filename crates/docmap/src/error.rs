// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for registry resolution and both transcoding engines.
//!
//! Every variant is a schema or programming error: an encode/decode call that
//! fails returns nothing partial, and none of these are worth retrying.

use std::fmt;

/// Errors produced by the registry, the resolver and the engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodeError {
    // ========================================================================
    // Registry / resolution errors
    // ========================================================================
    /// Encode/decode target's type was never declared (or declared without a
    /// classification).
    NotAMappedType { type_name: String },
    /// An ancestor has a different classification than its descendant.
    TypeHierarchyMismatch { descendant: String, ancestor: String },
    /// The supertype chain of a type loops back on itself.
    InheritanceCycle { type_name: String },

    // ========================================================================
    // Engine errors
    // ========================================================================
    /// A discriminator picked a type that is not classified Embeddable.
    InvalidEmbeddedType { field: String, type_name: String },
    /// A Root-classified instance was found nested inside another document.
    CrossDocumentReference { field: String, type_name: String },
    /// A multi-valued embedded field holds neither a sequence nor a keyed
    /// structure matching its declared shape.
    InvalidContainerShape {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A single-valued slot holds the wrong kind of value (plain data where an
    /// embedded instance is declared, or instance data in a scalar field).
    UnexpectedValue {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Nesting went past the configured recursion limit.
    DepthExceeded { limit: usize },

    // ========================================================================
    // Declarative schema errors
    // ========================================================================
    /// Declarative schema could not be read, parsed or validated.
    Schema(String),
}

impl fmt::Display for TranscodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAMappedType { type_name } => {
                write!(f, "type '{}' is not a mapped root or embeddable type", type_name)
            }
            Self::TypeHierarchyMismatch {
                descendant,
                ancestor,
            } => write!(
                f,
                "type '{}' and its ancestor '{}' have different classifications",
                descendant, ancestor
            ),
            Self::InheritanceCycle { type_name } => {
                write!(f, "supertype chain of '{}' is cyclic", type_name)
            }
            Self::InvalidEmbeddedType { field, type_name } => write!(
                f,
                "field '{}': resolved type '{}' is not embeddable",
                field, type_name
            ),
            Self::CrossDocumentReference { field, type_name } => write!(
                f,
                "field '{}': root type '{}' cannot be embedded in another document",
                field, type_name
            ),
            Self::InvalidContainerShape {
                field,
                expected,
                found,
            } => write!(
                f,
                "field '{}': expected {} container, found {}",
                field, expected, found
            ),
            Self::UnexpectedValue {
                field,
                expected,
                found,
            } => write!(f, "field '{}': expected {}, found {}", field, expected, found),
            Self::DepthExceeded { limit } => {
                write!(f, "nesting depth exceeds limit of {}", limit)
            }
            Self::Schema(msg) => write!(f, "schema error: {}", msg),
        }
    }
}

impl std::error::Error for TranscodeError {}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TranscodeError>;
