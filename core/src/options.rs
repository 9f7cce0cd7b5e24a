//! Per-call request options.
//!
//! # Design
//! `post` accepts either a bare field mapping or a `{header, fields}` pair.
//! `PostAttrs` makes that a sum type. Its `Deserialize` impl keeps the loose
//! map shape working for callers that carry attributes in JSON or TOML: a
//! `fields` key selects the structured form, otherwise every key other than
//! `header` is treated as a form field.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::http::{FieldValue, FormFields};

/// Options for `HttpClient::make_request`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    /// Header lines in `Name: value` form, sent in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Vec<String>>,
}

impl RequestOptions {
    pub fn with_header<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: Some(lines.into_iter().map(Into::into).collect()),
        }
    }
}

/// Attributes accepted by `HttpClient::post`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAttrs {
    /// The mapping is the body.
    Fields(FormFields),
    /// Explicit header lines and body fields.
    Structured {
        header: Option<Vec<String>>,
        fields: Option<FormFields>,
    },
}

impl PostAttrs {
    /// Split into the options and body fields that `prepare_request` takes.
    pub fn into_parts(self) -> (RequestOptions, FormFields) {
        match self {
            PostAttrs::Fields(fields) => (RequestOptions::default(), fields),
            PostAttrs::Structured { header, fields } => {
                let header = header.filter(|lines| !lines.is_empty());
                (RequestOptions { header }, fields.unwrap_or_default())
            }
        }
    }
}

impl Default for PostAttrs {
    fn default() -> Self {
        PostAttrs::Fields(FormFields::new())
    }
}

impl From<FormFields> for PostAttrs {
    fn from(fields: FormFields) -> Self {
        PostAttrs::Fields(fields)
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for PostAttrs {
    fn from(pairs: [(K, V); N]) -> Self {
        PostAttrs::Fields(FormFields::from(pairs))
    }
}

impl<'de> Deserialize<'de> for PostAttrs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PostAttrsVisitor)
    }
}

struct PostAttrsVisitor;

impl<'de> Visitor<'de> for PostAttrsVisitor {
    type Value = PostAttrs;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a field map, or a map with `header` and `fields` keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut header = None;
        let mut fields = None;
        let mut rest = FormFields::new();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "header" => header = Some(map.next_value::<Vec<String>>()?),
                "fields" => fields = Some(map.next_value::<FormFields>()?),
                _ => {
                    let value = map.next_value::<FieldValue>()?;
                    rest.insert(key, value.into_string());
                }
            }
        }

        Ok(match (header, fields) {
            (header, Some(fields)) => PostAttrs::Structured {
                header,
                fields: Some(fields),
            },
            (Some(header), None) => PostAttrs::Structured {
                header: Some(header),
                fields: (!rest.is_empty()).then_some(rest),
            },
            (None, None) => PostAttrs::Fields(rest),
        })
    }
}
