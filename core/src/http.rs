//! Request description types.
//!
//! # Design
//! A `RequestSpec` is plain data: everything the transport needs to perform
//! one request, built fresh per call by `HttpClient` and dropped when the call
//! returns. Keeping it free of transport handles lets request construction be
//! asserted on directly in tests, with the actual I/O living behind the
//! `Transport` trait.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Case-insensitive lookup of a verb name. Returns `None` for anything
    /// outside GET, POST, PUT, PATCH and DELETE.
    pub fn parse(verb: &str) -> Option<Self> {
        match verb.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered form fields. Insertion order is the encoding order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Duplicate names are kept and encoded in order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        form_encode(self.iter())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for FormFields {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for FormFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for FormFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FormFieldsVisitor)
    }
}

struct FormFieldsVisitor;

impl<'de> Visitor<'de> for FormFieldsVisitor {
    type Value = FormFields;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of form field names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut fields = FormFields::new();
        while let Some((name, value)) = map.next_entry::<String, FieldValue>()? {
            fields.insert(name, value.into_string());
        }
        Ok(fields)
    }
}

/// A scalar form value as it may appear in a config or JSON document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FieldValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    pub(crate) fn into_string(self) -> String {
        match self {
            FieldValue::Str(s) => s,
            FieldValue::Int(n) => n.to_string(),
            FieldValue::UInt(n) => n.to_string(),
            FieldValue::Float(n) => n.to_string(),
            // Booleans follow the 1/0 form convention rather than true/false.
            FieldValue::Bool(b) => String::from(if b { "1" } else { "0" }),
        }
    }
}

/// Request body payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Form fields, sent form-encoded (or as a query string on GET).
    Form(FormFields),
    /// A pre-encoded body, sent as-is.
    Raw(String),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Form(fields) => fields.is_empty(),
            Payload::Raw(raw) => raw.is_empty(),
        }
    }

    /// The payload rendered as `application/x-www-form-urlencoded` text.
    pub fn encode(&self) -> String {
        match self {
            Payload::Form(fields) => fields.encode(),
            Payload::Raw(raw) => raw.clone(),
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Form(FormFields::new())
    }
}

impl From<FormFields> for Payload {
    fn from(fields: FormFields) -> Self {
        Payload::Form(fields)
    }
}

impl From<String> for Payload {
    fn from(raw: String) -> Self {
        Payload::Raw(raw)
    }
}

impl From<&str> for Payload {
    fn from(raw: &str) -> Self {
        Payload::Raw(raw.to_string())
    }
}

/// One outgoing request, fully described.
///
/// Built by `HttpClient::prepare_request` (or internally by `get`), then
/// completed by `set_proxy` and handed to a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestSpec {
    pub url: String,
    pub method: HttpMethod,
    /// Set for PUT, PATCH and DELETE, which are sent as custom methods
    /// carrying a body.
    pub custom_method: bool,
    /// Header lines in `Name: value` form, verbatim and in order.
    pub headers: Vec<String>,
    pub body: Option<Payload>,
    pub verify_tls_peer: bool,
    /// Let the transport negotiate and decode a compressed response.
    pub accept_encoding: bool,
    /// `host[:port]` of the proxy to connect through.
    pub proxy: Option<String>,
    /// `username:password` for the proxy.
    pub proxy_credentials: Option<String>,
}

/// Encode pairs as `application/x-www-form-urlencoded`. Names and values are
/// percent-encoded, pairs joined with `&`.
pub fn form_encode<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        for verb in ["delete", "DELETE", "DeLeTe"] {
            assert_eq!(HttpMethod::parse(verb), Some(HttpMethod::Delete));
        }
        assert_eq!(HttpMethod::parse("patch"), Some(HttpMethod::Patch));
        assert_eq!(HttpMethod::parse("OPTIONS"), None);
        assert_eq!(HttpMethod::parse(""), None);
    }

    #[test]
    fn form_encode_escapes_reserved_characters() {
        let fields = FormFields::from([("q", "a b"), ("x&y", "1=2"), ("plain", "abc-_.~")]);
        assert_eq!(fields.encode(), "q=a%20b&x%26y=1%3D2&plain=abc-_.~");
    }

    #[test]
    fn form_encode_keeps_insertion_order_and_duplicates() {
        let mut fields = FormFields::new();
        fields.insert("z", "1");
        fields.insert("a", "2");
        fields.insert("z", "3");
        assert_eq!(fields.encode(), "z=1&a=2&z=3");
    }

    #[test]
    fn form_fields_deserialize_scalars_in_document_order() {
        let fields: FormFields =
            serde_json::from_str(r#"{"name":"Ann","age":42,"ratio":0.5,"admin":true,"off":false}"#)
                .unwrap();
        let pairs: Vec<_> = fields.iter().collect();
        assert_eq!(
            pairs,
            vec![("name", "Ann"), ("age", "42"), ("ratio", "0.5"), ("admin", "1"), ("off", "0")]
        );
    }

    #[test]
    fn form_fields_reject_nested_values() {
        let result: Result<FormFields, _> = serde_json::from_str(r#"{"a":{"b":1}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_payloads() {
        assert!(Payload::default().is_empty());
        assert!(Payload::from("").is_empty());
        assert!(!Payload::from("a=1").is_empty());
    }
}
