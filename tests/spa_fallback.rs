//! End-to-end tests for the SPA fallback rule: existing files are served
//! as-is, anything else gets the fallback document, and a missing fallback
//! ends in 404.

use std::fs;
use std::path::{Path, PathBuf};

use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use spa_server::config::{
    AppState, Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig,
};
use spa_server::handler::router::RequestContext;
use spa_server::handler::spa;

const INDEX_HTML: &str = "<html>app</html>";
const STYLES_CSS: &str = "body{}";

/// Create an isolated document root populated with the standard fixture
fn setup_root(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("spa_server_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(root.join("index.html"), INDEX_HTML).unwrap();
    fs::write(root.join("styles.css"), STYLES_CSS).unwrap();
    fs::write(root.join("assets/app.js"), "console.log(1)").unwrap();
    root
}

fn test_state(root: &Path) -> AppState {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        site: SiteConfig {
            root: root.to_string_lossy().into_owned(),
            fallback: "/index.html".to_string(),
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            access_log_format: "combined".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        },
        http: HttpConfig {
            max_body_size: 10_485_760,
        },
    };
    AppState::new(&config)
}

fn get(path: &str) -> RequestContext<'_> {
    RequestContext {
        path,
        is_head: false,
        if_none_match: None,
        range_header: None,
    }
}

async fn body_bytes(response: Response<Full<Bytes>>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

#[tokio::test]
async fn existing_file_served_directly() {
    let root = setup_root("existing_file");
    let state = test_state(&root);

    let response = spa::serve(&get("/styles.css"), &state).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/css"
    );
    assert_eq!(body_bytes(response).await, STYLES_CSS.as_bytes());

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn nested_file_served_directly() {
    let root = setup_root("nested_file");
    let state = test_state(&root);

    let response = spa::serve(&get("/assets/app.js"), &state).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/javascript"
    );

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn deep_link_falls_back_to_index() {
    let root = setup_root("deep_link");
    let state = test_state(&root);

    for path in ["/app/42/edit", "/foo/bar/baz", "/dashboard/settings", "/"] {
        let response = spa::serve(&get(path), &state).await;
        assert_eq!(response.status(), 200, "path {path}");
        assert_eq!(body_bytes(response).await, INDEX_HTML.as_bytes(), "path {path}");
    }

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn missing_asset_falls_back_to_index() {
    let root = setup_root("missing_asset");
    let state = test_state(&root);

    let response = spa::serve(&get("/missing.png"), &state).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/html; charset=utf-8"
    );
    assert_eq!(body_bytes(response).await, INDEX_HTML.as_bytes());

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn index_requested_directly_is_served_directly() {
    let root = setup_root("index_direct");
    let state = test_state(&root);

    let response = spa::serve(&get("/index.html"), &state).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_bytes(response).await, INDEX_HTML.as_bytes());

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn missing_fallback_is_404() {
    let root = setup_root("missing_fallback");
    fs::remove_file(root.join("index.html")).unwrap();
    let state = test_state(&root);

    let response = spa::serve(&get("/anything"), &state).await;
    assert_eq!(response.status(), 404);

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn repeated_requests_are_idempotent() {
    let root = setup_root("idempotent");
    let state = test_state(&root);

    let first = spa::serve(&get("/app/42/edit"), &state).await;
    let first_status = first.status();
    let first_body = body_bytes(first).await;

    for _ in 0..3 {
        let response = spa::serve(&get("/app/42/edit"), &state).await;
        assert_eq!(response.status(), first_status);
        assert_eq!(body_bytes(response).await, first_body);
    }

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn traversal_never_escapes_root() {
    let root = setup_root("traversal");
    let secret = root.parent().unwrap().join(format!(
        "spa_server_secret_{}.txt",
        std::process::id()
    ));
    fs::write(&secret, "top secret").unwrap();
    let state = test_state(&root);

    // The sibling file exists, so only the root prefix check stands between
    // the request and its content
    let sibling = format!("/../spa_server_secret_{}.txt", std::process::id());
    let mut attempts = vec![sibling.clone()];
    attempts.push(sibling.replace("..", "%2e%2e"));
    attempts.push("/a/../../../../etc/passwd".to_string());

    for path in &attempts {
        let response = spa::serve(&get(path), &state).await;
        // Traversal resolves to nothing, so the fallback document is served
        assert_eq!(response.status(), 200, "path {path}");
        let body = body_bytes(response).await;
        assert_eq!(body, INDEX_HTML.as_bytes(), "path {path}");
    }

    let _ = fs::remove_file(&secret);
    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn resolve_rejects_directories_and_outside_paths() {
    let root = setup_root("resolve");

    assert!(spa::resolve(&root, "/styles.css").await.is_some());
    assert!(spa::resolve(&root, "/assets").await.is_none());
    assert!(spa::resolve(&root, "/").await.is_none());
    assert!(spa::resolve(&root, "/../").await.is_none());
    assert!(spa::resolve(&root, "/no/such/file").await.is_none());

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn missing_document_root_is_404() {
    let root = std::env::temp_dir().join(format!("spa_server_gone_{}", std::process::id()));
    let _ = fs::remove_dir_all(&root);
    let state = test_state(&root);

    let response = spa::serve(&get("/index.html"), &state).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn head_request_has_headers_but_no_body() {
    let root = setup_root("head");
    let state = test_state(&root);

    let ctx = RequestContext {
        path: "/styles.css",
        is_head: true,
        if_none_match: None,
        range_header: None,
    };
    let response = spa::serve(&ctx, &state).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("content-length").unwrap(),
        &STYLES_CSS.len().to_string()
    );
    assert!(body_bytes(response).await.is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn conditional_request_returns_304() {
    let root = setup_root("conditional");
    let state = test_state(&root);

    let first = spa::serve(&get("/styles.css"), &state).await;
    let etag = first
        .headers()
        .get("etag")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let ctx = RequestContext {
        path: "/styles.css",
        is_head: false,
        if_none_match: Some(etag),
        range_header: None,
    };
    let response = spa::serve(&ctx, &state).await;
    assert_eq!(response.status(), 304);
    assert!(body_bytes(response).await.is_empty());

    let _ = fs::remove_dir_all(&root);
}

#[tokio::test]
async fn range_request_returns_partial_content() {
    let root = setup_root("range");
    let state = test_state(&root);

    let ctx = RequestContext {
        path: "/styles.css",
        is_head: false,
        if_none_match: None,
        range_header: Some("bytes=0-3".to_string()),
    };
    let response = spa::serve(&ctx, &state).await;
    assert_eq!(response.status(), 206);
    assert_eq!(
        response.headers().get("content-range").unwrap(),
        &format!("bytes 0-3/{}", STYLES_CSS.len())
    );
    assert_eq!(body_bytes(response).await, b"body");

    let _ = fs::remove_dir_all(&root);
}
