use axum::{
    extract::Path,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw, returned by `/echo`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EchoedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Lowercased header names, in the order received.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl EchoedRequest {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/status/{code}", any(status))
        .route("/bytes/{len}", any(bytes))
        .route("/latin1", any(latin1))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<EchoedRequest> {
    tracing::debug!(%method, %uri, "echo");
    let headers = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), value)
        })
        .collect();
    Json(EchoedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    })
}

/// Respond with `code` and its reason phrase as the body, e.g. 404 → "Not Found".
async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, status.canonical_reason().unwrap_or_default().to_string()),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status code {code}")),
    }
}

/// `len` bytes of `a`.
async fn bytes(Path(len): Path<usize>) -> Vec<u8> {
    vec![b'a'; len]
}

/// "café" in ISO-8859-1, which is not valid UTF-8.
async fn latin1() -> ([(header::HeaderName, &'static str); 1], &'static [u8]) {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")],
        b"caf\xe9",
    )
}
