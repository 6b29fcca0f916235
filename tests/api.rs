//! End-to-end tests of the HTTP API against a stub converter.

use axum::http::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

mod common;

async fn detail(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["detail"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health() {
    let server = common::start_server().await;

    let res = common::client().get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let body: Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_landing_page_is_html() {
    let server = common::start_server().await;

    let res = common::client().get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "{content_type}");
    assert!(res.text().await.unwrap().contains("<form"));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = common::start_server().await;

    let res = common::client()
        .get(server.url("/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_convert_requires_url() {
    let server = common::start_server().await;
    let client = common::client();

    for path in ["/convert?url=", "/convert", "/convert/"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(detail(res).await, "URL parameter is required", "{path}");
    }
    assert!(server.converter.calls().is_empty());
}

#[tokio::test]
async fn test_convert_whitespace_url_is_invalid() {
    let server = common::start_server().await;
    let client = common::client();

    for path in ["/convert?url=%20%20", "/convert/%20"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(detail(res).await, "Invalid URL", "{path}");
    }
    assert!(server.converter.calls().is_empty());
}

#[tokio::test]
async fn test_convert_repeated_url_uses_last() {
    let server = common::start_server().await;

    let res = common::client()
        .get(server.url("/convert?url=example.com&url=example.org"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(server.converter.last_call().locator, "https://example.org/");
}

#[tokio::test]
async fn test_undecodable_path_is_json_400() {
    let server = common::start_server().await;

    let res = common::client().get(server.url("/convert/%FF")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(detail(res).await, "Invalid URL");
    assert!(server.converter.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let server = common::start_server().await;

    let res = common::client().get(server.url("/nope")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(detail(res).await, "Not Found");
}

#[tokio::test]
async fn test_convert_normalizes_scheme() {
    let server = common::start_server().await;

    let res = common::client()
        .get(server.url("/convert"))
        .query(&[("url", "example.com")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/markdown; charset=utf-8");
    assert_eq!(res.text().await.unwrap(), "# Converted\n\nhttps://example.com/");
    assert_eq!(server.converter.last_call().locator, "https://example.com/");
}

#[tokio::test]
async fn test_convert_rejects_invalid_urls() {
    let server = common::start_server().await;
    let client = common::client();

    let cases = [
        ("http://exa mple.com", "Invalid URL"),
        ("localhost:8000", "Invalid URL: must be a valid FQDN"),
        ("http://192.168.1.10/admin", "Invalid URL: must be a valid FQDN"),
    ];
    for (url, expected) in cases {
        let res = client
            .get(server.url("/convert"))
            .query(&[("url", url)])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{url}");
        assert_eq!(detail(res).await, expected, "{url}");
    }
    assert!(server.converter.calls().is_empty());
}

#[tokio::test]
async fn test_convert_failure_is_500() {
    let server = common::start_server().await;

    let res = common::client()
        .get(server.url("/convert"))
        .query(&[("url", "https://example.com/fail")])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        detail(res).await,
        "Failed to convert URL: https://example.com/fail returned HTTP 404"
    );
}

#[tokio::test]
async fn test_convert_path_variant() {
    let server = common::start_server().await;
    let client = common::client();

    let res = client
        .get(server.url("/convert/docs.example.com/guide/intro"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        server.converter.last_call().locator,
        "https://docs.example.com/guide/intro"
    );

    let res = client
        .get(server.url("/convert/https://example.com/search?q=rust&page=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        server.converter.last_call().locator,
        "https://example.com/search?q=rust&page=2"
    );

    let res = client
        .get(server.url("/convert/127.0.0.1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .get(server.url("/convert/example.com/fail"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(detail(res).await.starts_with("Failed to convert URL: "));
}

#[tokio::test]
async fn test_upload_converts_and_cleans_up() {
    let server = common::start_server().await;

    let form = Form::new().part(
        "file",
        Part::bytes(b"Quarterly notes".to_vec()).file_name("notes.txt"),
    );
    let res = common::client()
        .post(server.url("/convert"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/markdown; charset=utf-8");
    assert_eq!(res.text().await.unwrap(), "# Quarterly notes");

    let call = server.converter.last_call();
    assert!(call.existed, "staged file should exist during conversion");
    assert!(call.locator.ends_with(".txt"), "{}", call.locator);
    assert!(!std::path::Path::new(&call.locator).exists());
    assert_eq!(common::staged_files(&server), 0);
}

#[tokio::test]
async fn test_upload_failure_is_500_and_cleans_up() {
    let server = common::start_server().await;

    let form = Form::new().part("file", Part::bytes(b"reject".to_vec()).file_name("slides.pdf"));
    let res = common::client()
        .post(server.url("/convert"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        detail(res).await,
        "Failed to convert file: unsupported format: rejected by stub"
    );
    assert!(server.converter.last_call().locator.ends_with(".pdf"));
    assert_eq!(common::staged_files(&server), 0);
}

#[tokio::test]
async fn test_upload_without_file() {
    let server = common::start_server().await;
    let client = common::client();

    // Multipart body without a `file` part.
    let form = Form::new().text("comment", "no attachment");
    let res = client.post(server.url("/convert")).multipart(form).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "No file provided");

    // `file` part without a filename.
    let form = Form::new().part("file", Part::bytes(b"data".to_vec()));
    let res = client.post(server.url("/convert")).multipart(form).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "No file provided");

    // Not multipart at all.
    let res = client
        .post(server.url("/convert"))
        .body("plain body")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(detail(res).await, "No file provided");

    assert!(server.converter.calls().is_empty());
}

#[tokio::test]
async fn test_upload_too_large() {
    let server = common::start_server().await;

    let payload = vec![b'x'; 11 * 1024 * 1024];
    let form = Form::new().part("file", Part::bytes(payload).file_name("big.txt"));
    let res = common::client()
        .post(server.url("/convert"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let detail = detail(res).await;
    assert!(detail.contains("10MB"), "{detail}");
    assert!(server.converter.calls().is_empty());
    assert_eq!(common::staged_files(&server), 0);
}

#[tokio::test]
async fn test_upload_over_request_limit() {
    let server = common::start_server().await;

    let payload = vec![b'x'; 40 * 1024 * 1024];
    let form = Form::new().part("file", Part::bytes(payload).file_name("huge.txt"));
    let res = common::client()
        .post(server.url("/convert"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(detail(res).await, "File too large. Maximum size is 10MB");
    assert!(server.converter.calls().is_empty());
    assert_eq!(common::staged_files(&server), 0);
}
