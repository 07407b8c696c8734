use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_store, Db};
use serde_json::Value;
use tower::ServiceExt;

const BEARER: &str = "Bearer test-key";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, BEARER)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, BEARER)
        .body(String::new())
        .unwrap()
}

const PAGE: &str = r#"{"email":"a@b.com","name":"Test","subdomain":"test-page","components":[]}"#;

// --- auth ---

#[tokio::test]
async fn primary_routes_require_bearer_token() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/pages")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(PAGE.to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn internal_routes_require_api_key() {
    let resp = app()
        .oneshot(empty_request("GET", "/internal/v1/pages/pg_1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- pages ---

#[tokio::test]
async fn create_page_returns_workspace_identifiers_only() {
    let resp = app().oneshot(json_request("POST", "/v1/pages", PAGE)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["workspaceSlug"], "test-page");
    assert_eq!(body["id"], body["workspaceId"]);
    assert!(body["id"].as_str().unwrap().starts_with("ws_"));
    assert!(body.get("email").is_none());
    assert!(body.get("name").is_none());
}

#[tokio::test]
async fn create_page_missing_email_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/pages", r#"{"name":"x","subdomain":"y"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_subdomain_conflicts() {
    let db = Db::default();
    let resp = app_with_store(db.clone())
        .oneshot(json_request("POST", "/v1/pages", PAGE))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app_with_store(db)
        .oneshot(json_request("POST", "/v1/pages", PAGE))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_embedded_component_stores_nothing() {
    let db = Db::default();
    let body = r#"{"email":"a@b.com","name":"Test","subdomain":"test-page",
        "components":[{"name":"API"},{"name":"DB","status":"DOWN"}]}"#;
    let resp = app_with_store(db.clone())
        .oneshot(json_request("POST", "/v1/pages", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let store = db.read().await;
    assert!(store.components.is_empty());
    assert!(store.pages.is_empty());
    assert!(store.workspaces.is_empty());
}

#[tokio::test]
async fn update_unknown_page_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/v2/pg_missing",
            r#"{"email":"a@b.com","name":"x","subdomain":"y"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_workspace_returns_404() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/v1/workspaces/ws_missing"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- components ---

#[tokio::test]
async fn component_on_unknown_page_returns_404() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/pg_missing/components", r#"{"name":"API"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_unknown_component_returns_404() {
    let db = Db::default();
    let resp = app_with_store(db.clone())
        .oneshot(json_request("POST", "/v1/pages", PAGE))
        .await
        .unwrap();
    let workspace_id = body_json(resp).await["id"].as_str().unwrap().to_string();

    let resp = app_with_store(db)
        .oneshot(empty_request("GET", &format!("/v2/{workspace_id}/components/cmp_missing")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn page_and_component_lifecycle() {
    let db = Db::default();
    let router = || app_with_store(db.clone());

    // create page
    let resp = router().oneshot(json_request("POST", "/v1/pages", PAGE)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let workspace_id = body_json(resp).await["workspaceId"].as_str().unwrap().to_string();

    // create group, then a member that references it with `group`
    let resp = router()
        .oneshot(json_request(
            "POST",
            &format!("/v1/{workspace_id}/components"),
            r#"{"name":"Backend","grouped":false}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let group_id = body_json(resp).await["id"].as_str().unwrap().to_string();

    let resp = router()
        .oneshot(json_request(
            "POST",
            &format!("/v1/{workspace_id}/components"),
            &format!(r#"{{"name":"API","status":"MAJOROUTAGE","grouped":true,"group":"{group_id}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["groupId"], group_id.as_str());
    assert!(created.get("group").is_none());
    let component_id = created["id"].as_str().unwrap().to_string();

    // read resolves the nested group
    let resp = router()
        .oneshot(empty_request(
            "GET",
            &format!("/v2/{workspace_id}/components/{component_id}"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = body_json(resp).await;
    assert_eq!(fetched["status"], "MAJOROUTAGE");
    assert_eq!(fetched["group"]["name"], "Backend");

    // full-replace update drops the group and description
    let resp = router()
        .oneshot(json_request(
            "PUT",
            &format!("/v2/{workspace_id}/components/{component_id}"),
            r#"{"name":"API v2","status":"OPERATIONAL","groupId":null}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["name"], "API v2");
    assert!(updated["groupId"].is_null());
    assert!(updated.get("group").is_none());

    // page read through the internal endpoint
    let resp = router()
        .oneshot(
            Request::builder()
                .uri(format!("/internal/v1/pages/{workspace_id}"))
                .header("x-api-key", "test-key")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["email"], "a@b.com");
    assert_eq!(page["name"]["default"], "Test");

    // delete component, page, workspace
    let resp = router()
        .oneshot(empty_request(
            "DELETE",
            &format!("/v1/{workspace_id}/components/{component_id}"),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router()
        .oneshot(empty_request("DELETE", &format!("/v2/{workspace_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router()
        .oneshot(empty_request("DELETE", &format!("/v1/workspaces/{workspace_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let store = db.read().await;
    assert!(store.pages.is_empty());
    assert!(store.workspaces.is_empty());
    assert!(store.components.is_empty());
}
