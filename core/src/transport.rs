//! Executes a `RequestSpec` over the network.
//!
//! # Design
//! `Transport` is the only seam between request construction and I/O.
//! `UreqTransport` builds a fresh `ureq::Agent` per request from the spec's
//! TLS and proxy settings; the agent lives on the stack of `execute` and is
//! released on every return path. Status codes are not treated as errors, so
//! a 404 body comes back like any other.

use tracing::{debug, warn};
use ureq::tls::TlsConfig;
use ureq::typestate::WithBody;
use ureq::{Agent, Proxy, RequestBuilder};

use crate::error::{ClientError, Result};
use crate::http::{HttpMethod, Payload, RequestSpec};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Performs one blocking request and returns the response body.
///
/// The body is read in full with no size limit. Bytes that are not valid
/// UTF-8 are replaced with U+FFFD and a warning is logged; callers needing
/// the exact bytes must supply their own transport.
pub trait Transport {
    fn execute(&self, request: &RequestSpec) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &RequestSpec) -> Result<String> {
        (**self).execute(request)
    }
}

/// Transport backed by ureq with rustls.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, request: &RequestSpec) -> Result<String> {
        let headers = parse_headers(&request.headers)?;
        let agent = build_agent(request)?;

        let needs_content_type = !headers
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
        let body = request.body.as_ref().map(Payload::encode);

        debug!(
            method = %request.method,
            url = %request.url,
            proxied = request.proxy.is_some(),
            has_body = body.is_some(),
            "sending request"
        );

        let mut response = match request.method {
            HttpMethod::Get => {
                let builder = with_headers(agent.get(request.url.as_str()), request, &headers);
                match body {
                    Some(body) => send(builder.force_send_body(), &body, needs_content_type),
                    None => builder.call(),
                }
            }
            HttpMethod::Delete => {
                let builder = with_headers(agent.delete(request.url.as_str()), request, &headers);
                match body {
                    Some(body) => send(builder.force_send_body(), &body, needs_content_type),
                    None => builder.call(),
                }
            }
            HttpMethod::Post => {
                let builder = with_headers(agent.post(request.url.as_str()), request, &headers);
                send_optional(builder, body.as_deref(), needs_content_type)
            }
            HttpMethod::Put => {
                let builder = with_headers(agent.put(request.url.as_str()), request, &headers);
                send_optional(builder, body.as_deref(), needs_content_type)
            }
            HttpMethod::Patch => {
                let builder = with_headers(agent.patch(request.url.as_str()), request, &headers);
                send_optional(builder, body.as_deref(), needs_content_type)
            }
        }?;

        let status = response.status().as_u16();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;
        debug!(status, bytes = bytes.len(), "response received");
        Ok(decode_body(bytes, &request.url))
    }
}

/// Body bytes as text. Invalid UTF-8 sequences become U+FFFD.
pub(crate) fn decode_body(bytes: Vec<u8>, url: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(url, "response body is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

fn tls_config(verify_tls_peer: bool) -> TlsConfig {
    TlsConfig::builder()
        .disable_verification(!verify_tls_peer)
        .build()
}

fn build_agent(request: &RequestSpec) -> Result<Agent> {
    let tls = tls_config(request.verify_tls_peer);

    // An explicit None keeps ureq from picking up proxies from the environment.
    let proxy = match &request.proxy {
        Some(target) => {
            let uri = proxy_uri(target, request.proxy_credentials.as_deref());
            let proxy = Proxy::new(&uri)
                .map_err(|e| ClientError::invalid(format!("invalid proxy {target:?}: {e}")))?;
            Some(proxy)
        }
        None => None,
    };

    Ok(Agent::config_builder()
        .http_status_as_error(false)
        .tls_config(tls)
        .proxy(proxy)
        .build()
        .new_agent())
}

/// Proxy URI in the form ureq accepts: `scheme://[user:pass@]host[:port]`.
/// A target without a scheme is treated as an HTTP proxy. Credentials are
/// split at the first `:` and percent-encoded.
pub(crate) fn proxy_uri(target: &str, credentials: Option<&str>) -> String {
    let (scheme, authority) = match target.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("http", target),
    };

    match credentials {
        Some(credentials) => {
            let (user, pass) = credentials.split_once(':').unwrap_or((credentials, ""));
            format!(
                "{scheme}://{}:{}@{authority}",
                urlencoding::encode(user),
                urlencoding::encode(pass)
            )
        }
        None => format!("{scheme}://{authority}"),
    }
}

/// Split `Name: value` lines. Rejects lines without a colon or with an
/// empty name before anything is sent.
pub(crate) fn parse_headers(lines: &[String]) -> Result<Vec<(String, String)>> {
    lines
        .iter()
        .map(|line| {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| ClientError::invalid(format!("malformed header line {line:?}")))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(ClientError::invalid(format!("header line {line:?} has no name")));
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

fn with_headers<B>(
    mut builder: RequestBuilder<B>,
    request: &RequestSpec,
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if !request.accept_encoding {
        builder = builder.header("accept-encoding", "identity");
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: &str,
    needs_content_type: bool,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    let builder = if needs_content_type {
        builder.header("content-type", FORM_CONTENT_TYPE)
    } else {
        builder
    };
    builder.send(body.as_bytes())
}

fn send_optional(
    builder: RequestBuilder<WithBody>,
    body: Option<&str>,
    needs_content_type: bool,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => send(builder, body, needs_content_type),
        None => builder.send_empty(),
    }
}
