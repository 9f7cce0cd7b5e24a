//! Verify request construction against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes operation inputs and the request the client is
//! expected to hand to its transport. A recording transport captures the
//! `RequestSpec` so nothing touches the network.

use std::cell::RefCell;

use httpclient_core::{
    ClientConfig, FormFields, HttpClient, HttpMethod, Payload, PostAttrs, ProxyConfig,
    RequestOptions, RequestSpec, Result, Transport,
};

#[derive(Default)]
struct Recorder {
    sent: RefCell<Vec<RequestSpec>>,
}

impl Transport for Recorder {
    fn execute(&self, request: &RequestSpec) -> Result<String> {
        self.sent.borrow_mut().push(request.clone());
        Ok(String::new())
    }
}

impl Recorder {
    fn last(&self) -> RequestSpec {
        self.sent.borrow().last().cloned().unwrap()
    }
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_attrs(value: &serde_json::Value) -> Payload {
    match value {
        serde_json::Value::String(raw) => Payload::Raw(raw.clone()),
        other => Payload::Form(serde_json::from_value::<FormFields>(other.clone()).unwrap()),
    }
}

fn expected_headers(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h.as_str().unwrap().to_string())
        .collect()
}

fn expected_body(value: &serde_json::Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

// ---------------------------------------------------------------------------
// make_request
// ---------------------------------------------------------------------------

#[test]
fn prepare_test_vectors() {
    let raw = include_str!("../../test-vectors/prepare.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let client = HttpClient::with_transport(ClientConfig::default(), Recorder::default());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let verb = case["verb"].as_str().unwrap();
        let url = case["url"].as_str().unwrap();
        let options: RequestOptions = serde_json::from_value(case["options"].clone()).unwrap();
        let attrs = parse_attrs(&case["attrs"]);
        let expected = &case["expected_request"];

        client.make_request(verb, url, &options, attrs).unwrap();
        let spec = client_last(&client);

        assert_eq!(spec.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(spec.custom_method, expected["custom_method"].as_bool().unwrap(), "{name}: custom method");
        assert_eq!(spec.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(spec.headers, expected_headers(&expected["headers"]), "{name}: headers");
        assert_eq!(spec.body.as_ref().map(Payload::encode), expected_body(&expected["body"]), "{name}: body");
        assert!(spec.accept_encoding, "{name}: accept encoding");
        assert!(spec.proxy.is_none(), "{name}: proxy");
    }
}

// ---------------------------------------------------------------------------
// post
// ---------------------------------------------------------------------------

#[test]
fn post_test_vectors() {
    let raw = include_str!("../../test-vectors/post.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let client = HttpClient::with_transport(ClientConfig::default(), Recorder::default());
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let attrs: PostAttrs = serde_json::from_value(case["attrs"].clone()).unwrap();
        let expected = &case["expected_request"];

        client.post("https://example.com/form", attrs).unwrap();
        let spec = client_last(&client);

        assert_eq!(spec.method, HttpMethod::Post, "{name}: method");
        assert_eq!(spec.url, "https://example.com/form", "{name}: url");
        assert_eq!(spec.headers, expected_headers(&expected["headers"]), "{name}: headers");
        assert_eq!(spec.body.as_ref().map(Payload::encode), expected_body(&expected["body"]), "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// proxy
// ---------------------------------------------------------------------------

#[test]
fn proxy_from_config_document() {
    let config: ClientConfig = serde_json::from_str(
        r#"{"proxy":{"host":"proxy.example.com","port":8080,"username":"u","password":"p"}}"#,
    )
    .unwrap();
    assert_eq!(
        config.proxy,
        Some(ProxyConfig::new("proxy.example.com").with_port(8080).with_credentials("u", "p"))
    );

    let client = HttpClient::with_transport(config, Recorder::default());
    client.get("http://example.com/").unwrap();
    let spec = client_last(&client);

    assert_eq!(spec.proxy.as_deref(), Some("proxy.example.com:8080"));
    assert_eq!(spec.proxy_credentials.as_deref(), Some("u:p"));
    assert!(!spec.verify_tls_peer);
}

fn client_last(client: &HttpClient<Recorder>) -> RequestSpec {
    client.transport().last()
}
