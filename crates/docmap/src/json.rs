// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridge between [`Document`] and `serde_json::Value`.
//!
//! JSON has no binary or date type: binary becomes an array of byte values and
//! date-times become their millisecond count. Non-finite doubles become null.

use crate::document::{Document, Scalar};
use serde_json::{Map, Number, Value as Json};

impl From<Json> for Document {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Document::NULL,
            Json::Bool(b) => Document::from(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Document::from(i),
                None => Document::from(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Document::from(s),
            Json::Array(items) => Document::array(items.into_iter().map(Document::from)),
            Json::Object(map) => {
                Document::object(map.into_iter().map(|(k, v)| (k, Document::from(v))))
            }
        }
    }
}

impl From<&Document> for Json {
    fn from(doc: &Document) -> Self {
        match doc {
            Document::Scalar(scalar) => match scalar {
                Scalar::Null => Json::Null,
                Scalar::Bool(b) => Json::Bool(*b),
                Scalar::Int(i) | Scalar::DateTime(i) => Json::Number(Number::from(*i)),
                Scalar::Double(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
                Scalar::String(s) => Json::String(s.to_string()),
                Scalar::Binary(bytes) => {
                    Json::Array(bytes.iter().map(|b| Json::Number(Number::from(*b))).collect())
                }
            },
            Document::Array(items) => Json::Array(items.iter().map(Json::from).collect()),
            Document::Object(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Json::from(v)))
                    .collect::<Map<String, Json>>(),
            ),
        }
    }
}

impl From<Document> for Json {
    fn from(doc: Document) -> Self {
        Json::from(&doc)
    }
}
