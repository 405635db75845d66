// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container adapter for the many-valued embedded shapes.
//!
//! Lists, keyed maps and ordered maps are walked and rebuilt through one
//! interface, so each engine has a single code path for all three. The shape
//! comes from the field declaration; a value that does not match it is
//! rejected, never coerced.

use crate::document::Document;
use crate::error::{Result, TranscodeError};
use crate::instance::Value;
use crate::registry::FieldShape;
use std::fmt;

/// Many-valued embedded shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContainerKind {
    List,
    KeyedMap,
    OrderedMap,
}

impl ContainerKind {
    /// Container kind of a field shape, `None` for single-valued shapes.
    pub(crate) fn of(shape: FieldShape) -> Option<Self> {
        match shape {
            FieldShape::EmbedList => Some(Self::List),
            FieldShape::EmbedKeyedMap => Some(Self::KeyedMap),
            FieldShape::EmbedOrderedMap => Some(Self::OrderedMap),
            FieldShape::Scalar | FieldShape::EmbedOne => None,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::List => "sequence",
            Self::KeyedMap | Self::OrderedMap => "keyed",
        }
    }
}

/// Position of one element inside its container.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Slot {
    Index(usize),
    Key(String),
}

impl Slot {
    /// Label for an element of `field`, e.g. `pets[1]` or `addresses.home`.
    pub(crate) fn label(&self, field: &str) -> String {
        match self {
            Self::Index(i) => format!("{}[{}]", field, i),
            Self::Key(k) => format!("{}.{}", field, k),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::Key(k) => f.write_str(k),
        }
    }
}

/// A container that can be walked element by element.
pub(crate) trait ContainerSource {
    type Item;

    /// Elements with their positions, in iteration order.
    fn entries(&self, kind: ContainerKind, field: &str) -> Result<Vec<(Slot, &Self::Item)>>;
}

/// A container that can be rebuilt from transformed elements.
pub(crate) trait ContainerTarget: Sized {
    fn build(kind: ContainerKind, items: Vec<(Slot, Self)>) -> Self;
}

fn shape_error(kind: ContainerKind, field: &str, found: &'static str) -> TranscodeError {
    TranscodeError::InvalidContainerShape {
        field: field.to_string(),
        expected: kind.expected(),
        found,
    }
}

impl ContainerSource for Value {
    type Item = Value;

    fn entries(&self, kind: ContainerKind, field: &str) -> Result<Vec<(Slot, &Value)>> {
        match (kind, self) {
            (ContainerKind::List, Value::List(items)) => Ok(items
                .iter()
                .enumerate()
                .map(|(i, v)| (Slot::Index(i), v))
                .collect()),
            (ContainerKind::KeyedMap | ContainerKind::OrderedMap, Value::Table(table)) => {
                // Tables have no order of their own; sort for stable output.
                let mut entries: Vec<(Slot, &Value)> = table
                    .iter()
                    .map(|(k, v)| (Slot::Key(k.clone()), v))
                    .collect();
                entries.sort_by(|(a, _), (b, _)| a.cmp(b));
                Ok(entries)
            }
            (ContainerKind::KeyedMap | ContainerKind::OrderedMap, Value::Ordered(map)) => Ok(map
                .iter()
                .map(|(k, v)| (Slot::Key(k.clone()), v))
                .collect()),
            (kind, other) => Err(shape_error(kind, field, other.kind_name())),
        }
    }
}

impl ContainerSource for Document {
    type Item = Document;

    fn entries(&self, kind: ContainerKind, field: &str) -> Result<Vec<(Slot, &Document)>> {
        match (kind, self) {
            (ContainerKind::List, Document::Array(items)) => Ok(items
                .iter()
                .enumerate()
                .map(|(i, v)| (Slot::Index(i), v))
                .collect()),
            (ContainerKind::KeyedMap | ContainerKind::OrderedMap, Document::Object(map)) => Ok(map
                .iter()
                .map(|(k, v)| (Slot::Key(k.clone()), v))
                .collect()),
            (kind, other) => Err(shape_error(kind, field, other.kind_name())),
        }
    }
}

impl ContainerTarget for Document {
    fn build(kind: ContainerKind, items: Vec<(Slot, Document)>) -> Self {
        match kind {
            ContainerKind::List => Document::array(items.into_iter().map(|(_, v)| v)),
            // Both keyed shapes encode to a plain object.
            ContainerKind::KeyedMap | ContainerKind::OrderedMap => {
                Document::object(items.into_iter().map(|(slot, v)| (slot.to_string(), v)))
            }
        }
    }
}

impl ContainerTarget for Value {
    fn build(kind: ContainerKind, items: Vec<(Slot, Value)>) -> Self {
        match kind {
            ContainerKind::List => Value::List(items.into_iter().map(|(_, v)| v).collect()),
            ContainerKind::KeyedMap => Value::Table(
                items
                    .into_iter()
                    .map(|(slot, v)| (slot.to_string(), v))
                    .collect(),
            ),
            ContainerKind::OrderedMap => Value::Ordered(
                items
                    .into_iter()
                    .map(|(slot, v)| (slot.to_string(), v))
                    .collect(),
            ),
        }
    }
}

/// Transform every element of `source` with `convert` and rebuild the
/// container on the other side. Stops at the first failing element.
pub(crate) fn transcode<S, T, F>(
    kind: ContainerKind,
    field: &str,
    source: &S,
    mut convert: F,
) -> Result<T>
where
    S: ContainerSource,
    T: ContainerTarget,
    F: FnMut(&Slot, &S::Item) -> Result<T>,
{
    let entries = source.entries(kind, field)?;
    let mut items = Vec::with_capacity(entries.len());
    for (slot, item) in entries {
        let converted = convert(&slot, item)?;
        items.push((slot, converted));
    }
    Ok(T::build(kind, items))
}
