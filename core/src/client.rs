//! Request builder, response parser and synchronous client for the Instatus API.
//!
//! # Design
//! Every operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`, so
//! the exact bytes the client would send can be checked without a server.
//! The plain operation methods (`create_component`, `delete_status_page`, ...)
//! glue the two together through the client's `Transport`.
//!
//! `InstatusClient` holds only read-only configuration and a shared transport
//! handle. It is cheap to clone and safe to call from several threads.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::endpoint::{self, Endpoint};
use crate::error::{ApiError, StepFailure};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Component, ComponentCreateRequest, ComponentResponse, ComponentUpdateRequest, Page, PageCreateRequest,
    PageCreateResponse, PageReadResponse, PageUpdate, PageUpdateRequest, PageUpdateResponse,
};

const CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// Synchronous, stateless client for the Instatus API.
#[derive(Clone)]
pub struct InstatusClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for InstatusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstatusClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl InstatusClient {
    /// Client with a blocking `ureq` transport using `config.timeout`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = Arc::new(UreqTransport::new(config.timeout));
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Components
    // -----------------------------------------------------------------------

    pub fn build_create_component(&self, page_id: &str, component: &Component) -> Result<HttpRequest, ApiError> {
        let body = ComponentCreateRequest::from(component);
        self.request(&endpoint::CREATE_COMPONENT, &[("page_id", page_id)], Some(&body))
    }

    /// The create endpoint does not return the nested group, so `group_name`
    /// stays empty.
    pub fn parse_create_component(&self, response: HttpResponse) -> Result<Component, ApiError> {
        let resp: ComponentResponse = parse_json(response)?;
        Ok(resp.into_component(false))
    }

    pub fn create_component(&self, page_id: &str, component: &Component) -> Result<Component, ApiError> {
        let req = self.build_create_component(page_id, component)?;
        self.parse_create_component(self.send(req)?)
    }

    pub fn build_get_component(&self, page_id: &str, component_id: &str) -> Result<HttpRequest, ApiError> {
        self.request::<()>(
            &endpoint::GET_COMPONENT,
            &[("page_id", page_id), ("component_id", component_id)],
            None,
        )
    }

    pub fn parse_get_component(&self, response: HttpResponse) -> Result<Component, ApiError> {
        let resp: ComponentResponse = parse_json(response)?;
        Ok(resp.into_component(true))
    }

    pub fn get_component(&self, page_id: &str, component_id: &str) -> Result<Component, ApiError> {
        let req = self.build_get_component(page_id, component_id)?;
        self.parse_get_component(self.send(req)?)
    }

    pub fn build_update_component(
        &self,
        page_id: &str,
        component_id: &str,
        component: &Component,
    ) -> Result<HttpRequest, ApiError> {
        let body = ComponentUpdateRequest::from(component);
        self.request(
            &endpoint::UPDATE_COMPONENT,
            &[("page_id", page_id), ("component_id", component_id)],
            Some(&body),
        )
    }

    pub fn parse_update_component(&self, response: HttpResponse) -> Result<Component, ApiError> {
        let resp: ComponentResponse = parse_json(response)?;
        Ok(resp.into_component(true))
    }

    /// Full replace of every mutable field.
    pub fn update_component(
        &self,
        page_id: &str,
        component_id: &str,
        component: &Component,
    ) -> Result<Component, ApiError> {
        let req = self.build_update_component(page_id, component_id, component)?;
        self.parse_update_component(self.send(req)?)
    }

    pub fn build_delete_component(&self, page_id: &str, component_id: &str) -> Result<HttpRequest, ApiError> {
        self.request::<()>(
            &endpoint::DELETE_COMPONENT,
            &[("page_id", page_id), ("component_id", component_id)],
            None,
        )
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn delete_component(&self, page_id: &str, component_id: &str) -> Result<(), ApiError> {
        let req = self.build_delete_component(page_id, component_id)?;
        self.parse_delete(self.send(req)?)
    }

    // -----------------------------------------------------------------------
    // Status pages
    // -----------------------------------------------------------------------

    pub fn build_create_status_page(&self, page: &Page) -> Result<HttpRequest, ApiError> {
        let body = PageCreateRequest::from(page);
        self.request(&endpoint::CREATE_PAGE, &[], Some(&body))
    }

    /// The response only carries identifiers and the workspace slug; every
    /// other field is copied from `requested`. The workspace identifier is
    /// the entity id; a bare `id` is only used when `workspaceId` is absent.
    pub fn parse_create_status_page(&self, requested: &Page, response: HttpResponse) -> Result<Page, ApiError> {
        let resp: PageCreateResponse = parse_json(response)?;
        let id = resp
            .workspace_id
            .or(resp.id)
            .ok_or_else(|| ApiError::Deserialization("page creation response has no identifier".to_string()))?;

        Ok(Page {
            id: Some(id.clone()),
            workspace_id: Some(id),
            workspace_slug: resp.workspace_slug,
            ..requested.clone()
        })
    }

    pub fn create_status_page(&self, page: &Page) -> Result<Page, ApiError> {
        let req = self.build_create_status_page(page)?;
        self.parse_create_status_page(page, self.send(req)?)
    }

    /// Page reads go through the auxiliary endpoint family; without an
    /// auxiliary base URL this fails with `ApiError::Unsupported`.
    pub fn build_get_status_page(&self, page_id: &str) -> Result<HttpRequest, ApiError> {
        self.request::<()>(&endpoint::GET_PAGE, &[("page_id", page_id)], None)
    }

    pub fn parse_get_status_page(&self, response: HttpResponse) -> Result<Page, ApiError> {
        let resp: PageReadResponse = parse_json(response)?;
        Ok(Page::from(resp))
    }

    pub fn get_status_page(&self, page_id: &str) -> Result<Page, ApiError> {
        let req = self.build_get_status_page(page_id)?;
        self.parse_get_status_page(self.send(req)?)
    }

    pub fn build_update_status_page(&self, page_id: &str, update: &PageUpdate) -> Result<HttpRequest, ApiError> {
        let body = PageUpdateRequest::from(update);
        self.request(&endpoint::UPDATE_PAGE, &[("page_id", page_id)], Some(&body))
    }

    /// Name comes from the `default` locale of the response; email and
    /// components are echoed from `requested`.
    pub fn parse_update_status_page(
        &self,
        requested: &PageUpdate,
        response: HttpResponse,
    ) -> Result<PageUpdate, ApiError> {
        let resp: PageUpdateResponse = parse_json(response)?;
        let name = resp
            .name
            .as_ref()
            .and_then(|n| n.canonical())
            .map(str::to_string)
            .unwrap_or_else(|| requested.name.clone());

        Ok(PageUpdate {
            email: requested.email.clone(),
            name,
            subdomain: resp.subdomain.unwrap_or_else(|| requested.subdomain.clone()),
            components: requested.components.clone(),
            logo_url: resp.logo_url.or_else(|| requested.logo_url.clone()),
            favicon_url: resp.favicon_url.or_else(|| requested.favicon_url.clone()),
            google_analytics: resp.google_analytics.or_else(|| requested.google_analytics.clone()),
            custom_domain: resp.custom_domain.or_else(|| requested.custom_domain.clone()),
        })
    }

    pub fn update_status_page(&self, page_id: &str, update: &PageUpdate) -> Result<PageUpdate, ApiError> {
        let req = self.build_update_status_page(page_id, update)?;
        self.parse_update_status_page(update, self.send(req)?)
    }

    pub fn build_delete_status_page(&self, page_id: &str) -> Result<HttpRequest, ApiError> {
        self.request::<()>(&endpoint::DELETE_PAGE, &[("page_id", page_id)], None)
    }

    pub fn build_delete_workspace(&self, workspace_id: &str) -> Result<HttpRequest, ApiError> {
        self.request::<()>(&endpoint::DELETE_WORKSPACE, &[("workspace_id", workspace_id)], None)
    }

    /// Deletes the page, then the workspace that owns it.
    ///
    /// Both steps are always attempted, in that order. If either fails the
    /// result is `ApiError::Aggregate` listing every failed step.
    /// Only the second step of `delete_status_page`.
    pub fn delete_workspace(&self, workspace_id: &str) -> Result<(), ApiError> {
        let req = self.build_delete_workspace(workspace_id)?;
        self.parse_delete(self.send(req)?)
    }

    pub fn delete_status_page(&self, page_id: &str, workspace_id: &str) -> Result<(), ApiError> {
        let steps = [
            (endpoint::DELETE_PAGE.name, self.build_delete_status_page(page_id)),
            (endpoint::DELETE_WORKSPACE.name, self.build_delete_workspace(workspace_id)),
        ];

        let mut failures = Vec::new();
        for (step, req) in steps {
            let outcome = req.and_then(|req| self.send(req)).and_then(|resp| self.parse_delete(resp));
            if let Err(error) = outcome {
                warn!("{step} failed: {error}");
                failures.push(StepFailure::new(step, error));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Aggregate(failures))
        }
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn request<B: Serialize>(
        &self,
        endpoint: &Endpoint,
        params: &[(&'static str, &str)],
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let url = endpoint.url(&self.config, params)?;
        let body = body
            .map(|b| serde_json::to_string(b).map_err(|e| ApiError::Serialization(e.to_string())))
            .transpose()?;
        Ok(HttpRequest {
            method: endpoint.method,
            url,
            headers: vec![
                endpoint.auth().header(&self.config.api_key),
                (CONTENT_TYPE.0.to_string(), CONTENT_TYPE.1.to_string()),
            ],
            body,
        })
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!("{} {}", request.method, request.url);
        let response = self.transport.execute(request)?;
        debug!("-> {}", response.status);
        Ok(response)
    }
}

/// Any 2xx is success; everything else carries the raw status and body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
