use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredPage {
    pub id: String,
    pub workspace_id: String,
    pub email: String,
    pub name: String,
    pub subdomain: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub google_analytics: Option<String>,
    pub custom_domain: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredComponent {
    pub id: String,
    #[serde(skip)]
    pub page_id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub show_uptime: bool,
    pub order: i64,
    pub grouped: bool,
    pub group_id: Option<String>,
    pub archived: bool,
    pub unique_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Map<String, Value>>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub pages: HashMap<String, StoredPage>,
    /// Workspace id to workspace slug.
    pub workspaces: HashMap<String, String>,
    pub components: HashMap<String, StoredComponent>,
}

impl Store {
    /// Pages are addressable by page id or by owning workspace id.
    fn page_key(&self, id: &str) -> Option<String> {
        self.pages
            .values()
            .find(|p| p.id == id || p.workspace_id == id)
            .map(|p| p.id.clone())
    }

    fn component_in_page(&self, page_id: &str, component_id: &str) -> Option<&StoredComponent> {
        self.components
            .get(component_id)
            .filter(|c| c.page_id == page_id)
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

const STATUSES: [&str; 5] = [
    "OPERATIONAL",
    "UNDERMAINTENANCE",
    "DEGRADEDPERFORMANCE",
    "PARTIALOUTAGE",
    "MAJOROUTAGE",
];

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePage {
    pub email: String,
    pub name: String,
    pub subdomain: String,
    #[serde(default)]
    pub components: Vec<CreateComponent>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub google_analytics: Option<String>,
    pub custom_domain: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePage {
    pub email: String,
    pub name: String,
    pub subdomain: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub google_analytics: Option<String>,
    pub custom_domain: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComponent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
    pub show_uptime: Option<bool>,
    pub order: Option<i64>,
    #[serde(default)]
    pub grouped: bool,
    pub group: Option<String>,
    #[serde(default)]
    pub archived: bool,
    pub translations: Option<Map<String, Value>>,
}

/// Full replace: anything omitted falls back to its default.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComponent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
    pub show_uptime: Option<bool>,
    pub order: Option<i64>,
    #[serde(default)]
    pub grouped: bool,
    pub group_id: Option<String>,
    #[serde(default)]
    pub archived: bool,
    pub translations: Option<Map<String, Value>>,
}

pub fn app() -> Router {
    app_with_store(Db::default())
}

/// Router over a caller-provided store so tests can inspect it.
pub fn app_with_store(db: Db) -> Router {
    let primary = Router::new()
        .route("/v1/pages", post(create_page))
        .route("/v2/{page_id}", put(update_page).delete(delete_page))
        .route("/v1/workspaces/{workspace_id}", delete(delete_workspace))
        .route("/v1/{page_id}/components", post(create_component))
        .route("/v1/{page_id}/components/{component_id}", delete(delete_component))
        .route(
            "/v2/{page_id}/components/{component_id}",
            get(get_component).put(update_component),
        )
        .route_layer(middleware::from_fn(require_bearer));

    let internal = Router::new()
        .route("/internal/v1/pages/{page_id}", get(read_page))
        .route_layer(middleware::from_fn(require_api_key));

    primary.merge(internal).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn require_bearer(request: Request, next: Next) -> Result<Response, StatusCode> {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| !token.is_empty());
    if !authorized {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

async fn require_api_key(request: Request, next: Next) -> Result<Response, StatusCode> {
    let authorized = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| !key.is_empty());
    if !authorized {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn localized(name: &str) -> Value {
    json!({ "en": name, "default": name })
}

async fn create_page(State(db): State<Db>, Json(input): Json<CreatePage>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    if store.pages.values().any(|p| p.subdomain == input.subdomain) {
        return Err(error(StatusCode::CONFLICT, "subdomain already taken"));
    }

    let page = StoredPage {
        id: new_id("pg"),
        workspace_id: new_id("ws"),
        email: input.email,
        name: input.name,
        subdomain: input.subdomain,
        logo_url: input.logo_url,
        favicon_url: input.favicon_url,
        google_analytics: input.google_analytics,
        custom_domain: input.custom_domain,
    };

    let components = input
        .components
        .into_iter()
        .enumerate()
        .map(|(index, component)| build_component(&page.id, component, index as i64 + 1))
        .collect::<ApiResult<Vec<_>>>()?;
    for stored in components {
        store.components.insert(stored.id.clone(), stored);
    }

    store.workspaces.insert(page.workspace_id.clone(), page.subdomain.clone());
    let body = json!({
        "id": page.workspace_id,
        "workspaceId": page.workspace_id,
        "workspaceSlug": page.subdomain,
    });
    store.pages.insert(page.id.clone(), page);
    Ok(Json(body))
}

async fn read_page(State(db): State<Db>, Path(page_id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let key = store
        .page_key(&page_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "page not found"))?;
    let page = &store.pages[&key];
    Ok(Json(json!({
        "id": page.id,
        "workspaceId": page.workspace_id,
        "workspaceSlug": page.subdomain,
        "email": page.email,
        "name": localized(&page.name),
        "subdomain": page.subdomain,
        "logoUrl": page.logo_url,
        "faviconUrl": page.favicon_url,
        "googleAnalytics": page.google_analytics,
        "customDomain": page.custom_domain,
    })))
}

async fn update_page(
    State(db): State<Db>,
    Path(page_id): Path<String>,
    Json(input): Json<UpdatePage>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let key = store
        .page_key(&page_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "page not found"))?;
    if store
        .pages
        .values()
        .any(|p| p.id != key && p.subdomain == input.subdomain)
    {
        return Err(error(StatusCode::CONFLICT, "subdomain already taken"));
    }

    let page = store
        .pages
        .get_mut(&key)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "page not found"))?;
    page.email = input.email;
    page.name = input.name;
    page.subdomain = input.subdomain;
    page.logo_url = input.logo_url;
    page.favicon_url = input.favicon_url;
    page.google_analytics = input.google_analytics;
    page.custom_domain = input.custom_domain;

    Ok(Json(json!({
        "id": page.id,
        "subdomain": page.subdomain,
        "name": localized(&page.name),
        "logoUrl": page.logo_url,
        "faviconUrl": page.favicon_url,
        "googleAnalytics": page.google_analytics,
        "customDomain": page.custom_domain,
    })))
}

async fn delete_page(State(db): State<Db>, Path(page_id): Path<String>) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let key = store
        .page_key(&page_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "page not found"))?;
    store.pages.remove(&key);
    store.components.retain(|_, c| c.page_id != key);
    Ok(Json(json!({ "id": key })))
}

async fn delete_workspace(State(db): State<Db>, Path(workspace_id): Path<String>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .workspaces
        .remove(&workspace_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "workspace not found"))
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

fn validate_status(status: Option<String>) -> ApiResult<String> {
    match status {
        None => Ok(STATUSES[0].to_string()),
        Some(s) if STATUSES.contains(&s.as_str()) => Ok(s),
        Some(_) => Err(error(StatusCode::BAD_REQUEST, "invalid status")),
    }
}

fn build_component(page_id: &str, input: CreateComponent, default_order: i64) -> ApiResult<StoredComponent> {
    let id = new_id("cmp");
    Ok(StoredComponent {
        unique_email: format!("{id}@status.local"),
        id,
        page_id: page_id.to_string(),
        name: input.name,
        description: input.description,
        status: validate_status(input.status)?,
        show_uptime: input.show_uptime.unwrap_or(true),
        order: input.order.unwrap_or(default_order),
        grouped: input.grouped,
        group_id: input.group,
        archived: input.archived,
        translations: input.translations,
    })
}

/// Component JSON with the nested `group` object resolved.
fn with_group(store: &Store, component: &StoredComponent) -> Value {
    let mut body = json!(component);
    if let Some(group) = component
        .group_id
        .as_deref()
        .and_then(|id| store.component_in_page(&component.page_id, id))
    {
        body["group"] = json!({ "id": group.id, "name": group.name });
    }
    body
}

fn check_group(store: &Store, page_id: &str, group_id: Option<&str>) -> ApiResult<()> {
    match group_id {
        Some(id) if store.component_in_page(page_id, id).is_none() => {
            Err(error(StatusCode::BAD_REQUEST, "group not found"))
        }
        _ => Ok(()),
    }
}

async fn create_component(
    State(db): State<Db>,
    Path(page_id): Path<String>,
    Json(input): Json<CreateComponent>,
) -> ApiResult<(StatusCode, Json<StoredComponent>)> {
    let mut store = db.write().await;
    let key = store
        .page_key(&page_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "page not found"))?;
    check_group(&store, &key, input.group.as_deref())?;

    let next_order = store.components.values().filter(|c| c.page_id == key).count() as i64 + 1;
    let component = build_component(&key, input, next_order)?;
    store.components.insert(component.id.clone(), component.clone());
    Ok((StatusCode::CREATED, Json(component)))
}

async fn get_component(
    State(db): State<Db>,
    Path((page_id, component_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let key = store
        .page_key(&page_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "page not found"))?;
    let component = store
        .component_in_page(&key, &component_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "component not found"))?;
    Ok(Json(with_group(&store, component)))
}

async fn update_component(
    State(db): State<Db>,
    Path((page_id, component_id)): Path<(String, String)>,
    Json(input): Json<UpdateComponent>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let key = store
        .page_key(&page_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "page not found"))?;
    if store.component_in_page(&key, &component_id).is_none() {
        return Err(error(StatusCode::NOT_FOUND, "component not found"));
    }
    check_group(&store, &key, input.group_id.as_deref())?;
    let status = validate_status(input.status)?;

    let component = store
        .components
        .get_mut(&component_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "component not found"))?;
    component.name = input.name;
    component.description = input.description;
    component.status = status;
    component.show_uptime = input.show_uptime.unwrap_or(true);
    if let Some(order) = input.order {
        component.order = order;
    }
    component.grouped = input.grouped;
    component.group_id = input.group_id;
    component.archived = input.archived;
    component.translations = input.translations;

    let component = component.clone();
    Ok(Json(with_group(&store, &component)))
}

async fn delete_component(
    State(db): State<Db>,
    Path((page_id, component_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let key = store
        .page_key(&page_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "page not found"))?;
    if store.component_in_page(&key, &component_id).is_none() {
        return Err(error(StatusCode::NOT_FOUND, "component not found"));
    }
    store.components.remove(&component_id);
    Ok(Json(json!({ "id": component_id })))
}
