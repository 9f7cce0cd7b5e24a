//! Blocking HTTP client wrapper.
//!
//! # Design
//! `HttpClient` holds its `ClientConfig` and a `Transport` and nothing else;
//! no state survives between calls. Every operation follows the same path:
//! validate the URL, build a `RequestSpec`, apply the proxy, hand the spec to
//! the transport, return the body. Request construction is public through
//! `prepare_request` so it can be checked without touching the network.

use tracing::warn;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::{HttpMethod, Payload, RequestSpec};
use crate::options::{PostAttrs, RequestOptions};
use crate::transport::{Transport, UreqTransport};

/// Synchronous client issuing one request per call and returning the raw
/// response body.
///
/// HTTP status codes are not inspected: a 404 or 500 response is returned as
/// a successful body.
#[derive(Debug, Clone, Default)]
pub struct HttpClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport)
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url` and return the body.
    pub fn get(&self, url: &str) -> Result<String> {
        require_url(url, "you must set a URL to GET")?;

        let mut spec = RequestSpec {
            url: url.to_string(),
            method: HttpMethod::Get,
            verify_tls_peer: self.config.verify_tls_peer,
            ..RequestSpec::default()
        };
        self.set_proxy(&mut spec);
        self.transport.execute(&spec)
    }

    /// POST form fields to `url` and return the body.
    ///
    /// `attrs` is either the field mapping itself or a
    /// `PostAttrs::Structured` carrying header lines and fields.
    pub fn post(&self, url: &str, attrs: impl Into<PostAttrs>) -> Result<String> {
        require_url(url, "you must set a URL to POST")?;

        let (options, fields) = attrs.into().into_parts();
        let mut spec = self.prepare_request(url, &options, Payload::Form(fields), "POST");
        self.set_proxy(&mut spec);
        self.transport.execute(&spec)
    }

    /// Issue a request with any verb.
    ///
    /// `verb` is matched case-insensitively. A verb outside GET, POST, PUT,
    /// PATCH and DELETE gets no verb-specific treatment: it goes out as a POST
    /// with an empty body to `url`, and `attrs` are ignored.
    pub fn make_request(
        &self,
        verb: &str,
        url: &str,
        options: &RequestOptions,
        attrs: impl Into<Payload>,
    ) -> Result<String> {
        require_url(url, "you must set a URL to make a request")?;

        let mut spec = self.prepare_request(url, options, attrs.into(), verb);
        self.set_proxy(&mut spec);
        self.transport.execute(&spec)
    }

    /// Build the request for `verb` without sending it. The proxy is applied
    /// separately by the calling operation.
    pub fn prepare_request(
        &self,
        url: &str,
        options: &RequestOptions,
        attrs: Payload,
        verb: &str,
    ) -> RequestSpec {
        let mut spec = RequestSpec {
            url: url.to_string(),
            verify_tls_peer: self.config.verify_tls_peer,
            accept_encoding: true,
            ..RequestSpec::default()
        };

        if let Some(header) = options.header.as_ref().filter(|h| !h.is_empty()) {
            spec.headers = header.clone();
        }

        let body = (!attrs.is_empty()).then_some(attrs);

        match HttpMethod::parse(verb) {
            Some(HttpMethod::Post) => {
                spec.method = HttpMethod::Post;
                spec.body = body;
            }
            Some(method @ (HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete)) => {
                spec.method = method;
                spec.custom_method = true;
                spec.body = body;
            }
            Some(HttpMethod::Get) => {
                if let Some(query) = body {
                    spec.url = format!("{url}?{}", query.encode());
                }
            }
            // Without a verb-specific option the request still carries an
            // empty post body, which makes it a bodiless POST on the wire.
            None => {
                warn!(verb, url, "unrecognized HTTP verb, sending as an empty POST");
                spec.method = HttpMethod::Post;
            }
        }

        spec
    }

    /// Point `spec` at the configured proxy, with credentials when both a
    /// username and a password are set. No-op without a proxy or with an
    /// empty proxy host.
    fn set_proxy(&self, spec: &mut RequestSpec) {
        let Some(proxy) = self.config.proxy.as_ref().filter(|p| !p.host.is_empty()) else {
            return;
        };
        spec.proxy = Some(proxy.target());
        spec.proxy_credentials = proxy.credentials();
    }
}

fn require_url(url: &str, msg: &str) -> Result<()> {
    if url.is_empty() {
        return Err(ClientError::invalid(msg));
    }
    Ok(())
}
