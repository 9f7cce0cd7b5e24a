//! Minimal blocking HTTP client wrapper.
//!
//! # Overview
//! `HttpClient` turns a verb, a URL and a set of attributes into one HTTP(S)
//! request and returns the raw response body as a string. Requests can go
//! through an authenticated proxy, and TLS peer verification is configurable.
//!
//! # Design
//! - `ClientConfig` is fixed at construction; calls share no other state.
//! - Each call builds a `RequestSpec` (plain data) and hands it to a
//!   `Transport`. `UreqTransport` is the default; tests swap in their own.
//! - Status codes are never inspected. Only a missing URL, a malformed
//!   header or proxy setting, or a transport failure produce an error.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod transport;

pub use client::HttpClient;
pub use config::{ClientConfig, ProxyConfig};
pub use error::{ClientError, Result};
pub use http::{form_encode, FormFields, HttpMethod, Payload, RequestSpec};
pub use options::{PostAttrs, RequestOptions};
pub use transport::{Transport, UreqTransport};
