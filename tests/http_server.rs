//! Development server handlers, exercised in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use view_router::config::{RouterAppConfig, ServerConfig};
use view_router::http::{HttpServer, X_REQUEST_ID, X_ROUTE};
use view_router::lifecycle;
use view_router::navigation::Navigator;

mod common;

const SHELL: &str = "<html><body><div id=\"app\"></div></body></html>";

fn app() -> Router {
    let navigator = common::navigator(Arc::new(common::app_views()));
    HttpServer::new(navigator, SHELL.into(), &ServerConfig::default()).router()
}

fn app_with(config: &RouterAppConfig) -> Router {
    let tree = lifecycle::build_tree(config).unwrap();
    let navigator = Arc::new(Navigator::new(
        tree,
        Arc::new(common::app_views()),
        config.router.history,
        config.router.base.clone(),
    ));
    HttpServer::new(navigator, SHELL.into(), &config.server).router()
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_routes_listing() {
    let response = get(app(), "/_router/routes").await;
    assert_eq!(response.status(), StatusCode::OK);

    let routes = body_json(response).await;
    let routes = routes.as_array().unwrap();
    assert_eq!(routes.len(), 7);
    assert_eq!(routes[0]["path"], "/admin");
    assert_eq!(routes[0]["section"], "admin");
    assert_eq!(routes[1]["name"], "admin-user");
}

#[tokio::test]
async fn test_resolve_endpoint() {
    let response = get(app(), "/_router/resolve?location=%2Fadmin%2Fusers%3Fpage%3D2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let route = body_json(response).await;
    assert_eq!(route["name"], "admin-user");
    assert_eq!(route["section"], "admin");
    assert_eq!(route["query"]["page"], "2");
    assert_eq!(route["matched"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_resolve_endpoint_miss() {
    let response = get(app(), "/_router/resolve?location=%2Fadmin%2FproductManager").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error = body_json(response).await;
    assert!(error["error"].as_str().unwrap().contains("/admin/productManager"));
}

#[tokio::test]
async fn test_shell_for_known_location() {
    let response = get(app(), "/about").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_ROUTE], "about");
    assert!(response.headers().contains_key(X_REQUEST_ID));
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(body_text(response).await, SHELL);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(X_REQUEST_ID, "trace-me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_ROUTE], "home");
    assert_eq!(response.headers()[X_REQUEST_ID], "trace-me");
}

#[tokio::test]
async fn test_unknown_location_is_404() {
    let response = get(app(), "/admin/productManager").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!response.headers().contains_key(X_ROUTE));
}

#[tokio::test]
async fn test_not_found_view_serves_shell_with_404() {
    let mut config = RouterAppConfig::default();
    config.router.not_found_view = Some("page/user/home".into());

    let response = get(app_with(&config), "/no/such/page").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[X_ROUTE], "not-found");
    assert_eq!(body_text(response).await, SHELL);
}

#[tokio::test]
async fn test_base_is_stripped() {
    let mut config = RouterAppConfig::default();
    config.router.base = "/app".into();

    let response = get(app_with(&config), "/app/admin/products").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_ROUTE], "admin-product");

    let response = get(app_with(&config), "/app").await;
    assert_eq!(response.headers()[X_ROUTE], "home");
}

#[tokio::test]
async fn test_repeated_leading_slashes_are_paths() {
    let response = get(app(), "//about").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_ROUTE], "about");

    let response = get(app(), "//admin/users").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_ROUTE], "admin-user");
}

#[tokio::test]
async fn test_resolve_endpoint_rejects_absolute_urls() {
    let response = get(
        app(),
        "/_router/resolve?location=https%3A%2F%2Fevil.example%2Fcontact",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resolve_endpoint_takes_app_paths() {
    let mut config = RouterAppConfig::default();
    config.router.base = "/app".into();
    config.router.history = view_router::navigation::HistoryMode::Hash;

    let response = get(app_with(&config), "/_router/resolve?location=%2Fabout").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "about");
}
