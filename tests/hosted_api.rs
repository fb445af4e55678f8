#![cfg(feature = "hosted")]

//! Integration tests for the hosted API backend against a local mock server.

use std::io::Read;
use std::path::Path;
use std::sync::mpsc;

use shotbench::hosted::{ApiConfig, HostedRenderer, ResponseMode, API_ENDPOINT};
use shotbench::{Error, RenderOutput, Renderer};

fn test_config(endpoint: String) -> ApiConfig {
    ApiConfig {
        access_key: "test-key".to_string(),
        endpoint,
    }
}

/// Serve a single request, forwarding its body and access-key header to the
/// test through a channel.
fn serve_one(
    response: tiny_http::Response<std::io::Cursor<Vec<u8>>>,
) -> (String, mpsc::Receiver<(String, Option<String>)>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        if let Ok(mut request) = server.recv() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let key = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("X-Access-Key"))
                .map(|h| h.value.to_string());
            let _ = tx.send((body, key));
            let _ = request.respond(response);
        }
    });

    (format!("http://{}", addr), rx)
}

#[test]
fn full_image_mode_returns_the_response_bytes() {
    let png = vec![0x89, 0x50, 0x4e, 0x47];
    let (endpoint, rx) = serve_one(tiny_http::Response::from_data(png.clone()));

    let mut renderer = HostedRenderer::new(
        "<p>hi</p>".to_string(),
        test_config(endpoint),
        ResponseMode::FullImage,
    )
    .unwrap();

    match renderer.render(Path::new("unused.png")).unwrap() {
        RenderOutput::Payload(bytes) => assert_eq!(bytes, png),
        other => panic!("expected payload, got {:?}", other),
    }

    let (body, key) = rx.recv().unwrap();
    assert_eq!(key.as_deref(), Some("test-key"));
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["html"], "<p>hi</p>");
    assert_eq!(json["format"], "png");
    assert_eq!(json["response_type"], "by_format");
}

#[test]
fn empty_mode_requests_and_returns_no_payload() {
    let (endpoint, rx) = serve_one(tiny_http::Response::from_data(Vec::new()));

    let mut renderer = HostedRenderer::new(
        "<p>hi</p>".to_string(),
        test_config(endpoint),
        ResponseMode::Empty,
    )
    .unwrap();

    match renderer.render(Path::new("unused.png")).unwrap() {
        RenderOutput::NoPayload => {}
        other => panic!("expected no payload, got {:?}", other),
    }

    let (body, _) = rx.recv().unwrap();
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["response_type"], "empty");
}

#[test]
fn non_success_status_is_a_render_error() {
    let (endpoint, _rx) = serve_one(
        tiny_http::Response::from_data(b"upstream exploded".to_vec()).with_status_code(500),
    );

    let mut renderer = HostedRenderer::new(
        String::new(),
        test_config(endpoint),
        ResponseMode::FullImage,
    )
    .unwrap();

    match renderer.render(Path::new("unused.png")).unwrap_err() {
        Error::Render(msg) => assert!(msg.contains("500"), "{}", msg),
        other => panic!("expected render error, got {:?}", other),
    }
}

#[test]
fn access_key_comes_from_the_environment() {
    std::env::remove_var(shotbench::hosted::API_KEY_ENV);
    assert!(matches!(ApiConfig::from_env(), Err(Error::Config(_))));

    std::env::set_var(shotbench::hosted::API_KEY_ENV, "from-env");
    let config = ApiConfig::from_env().unwrap();
    assert_eq!(config.access_key, "from-env");
    assert_eq!(config.endpoint, API_ENDPOINT);
    std::env::remove_var(shotbench::hosted::API_KEY_ENV);
}
