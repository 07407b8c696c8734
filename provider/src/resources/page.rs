//! `instatus_page`: a status page together with the workspace that owns it.
//!
//! The host identifier is whatever page creation returned, which is the
//! workspace identifier. It is also stored as `workspace_id` so deletion can
//! remove the workspace; the API does not cascade.
//!
//! When the page is deleted but the workspace is not, `page_deleted` is set
//! and the next delete only retries the workspace.

use instatus_core::endpoint::{DELETE_PAGE, DELETE_WORKSPACE};
use instatus_core::{InstatusClient, Page, PageUpdate};
use log::warn;

use crate::data::ResourceData;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ProviderError;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};

pub const TYPE_NAME: &str = "instatus_page";

const PAGE_DELETED: &str = "page_deleted";

const BRANDING: [&str; 4] = ["logo_url", "favicon_url", "google_analytics", "custom_domain"];

#[derive(Debug, Default, Clone, Copy)]
pub struct PageResource;

struct Branding {
    logo_url: Option<String>,
    favicon_url: Option<String>,
    google_analytics: Option<String>,
    custom_domain: Option<String>,
}

fn branding(data: &ResourceData) -> Result<Branding, ProviderError> {
    Ok(Branding {
        logo_url: data.get_string("logo_url")?,
        favicon_url: data.get_string("favicon_url")?,
        google_analytics: data.get_string("google_analytics")?,
        custom_domain: data.get_string("custom_domain")?,
    })
}

fn write_branding(data: &mut ResourceData, values: [Option<String>; 4]) {
    for (key, value) in BRANDING.into_iter().zip(values) {
        data.set_opt(key, value);
    }
}

fn write_page(data: &mut ResourceData, page: Page) {
    data.set("email", page.email);
    data.set("name", page.name);
    data.set("subdomain", page.subdomain);
    write_branding(
        data,
        [page.logo_url, page.favicon_url, page.google_analytics, page.custom_domain],
    );
    if let Some(workspace_id) = page.workspace_id {
        data.set("workspace_id", workspace_id);
    }
    if let Some(slug) = page.workspace_slug {
        data.set("workspace_slug", slug);
    }
}

impl Resource for PageResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with(
                "email",
                Attribute::required(AttributeType::String, "Billing email address for the status page workspace"),
            )
            .with(
                "name",
                Attribute::required(AttributeType::String, "Display name for the status page"),
            )
            .with(
                "subdomain",
                Attribute::required(AttributeType::String, "Subdomain slug used for the public status page"),
            )
            .with("logo_url", Attribute::optional(AttributeType::String, "Logo image URL"))
            .with("favicon_url", Attribute::optional(AttributeType::String, "Favicon URL"))
            .with(
                "google_analytics",
                Attribute::optional(AttributeType::String, "Google Analytics tracking ID"),
            )
            .with(
                "custom_domain",
                Attribute::optional(AttributeType::String, "Custom domain serving the status page"),
            )
            .with(
                "workspace_id",
                Attribute::computed(AttributeType::String, "Identifier of the workspace that owns the page"),
            )
            .with(
                "workspace_slug",
                Attribute::computed(AttributeType::String, "Server-generated workspace slug"),
            )
            .with(
                PAGE_DELETED,
                Attribute::computed(AttributeType::Bool, "Page removed, workspace deletion still pending"),
            )
    }

    fn create(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let b = branding(data)?;
        let page = Page {
            email: data.require_string("email")?,
            name: data.require_string("name")?,
            subdomain: data.require_string("subdomain")?,
            logo_url: b.logo_url,
            favicon_url: b.favicon_url,
            google_analytics: b.google_analytics,
            custom_domain: b.custom_domain,
            ..Page::default()
        };

        let created = client
            .create_status_page(&page)
            .map_err(|e| ProviderError::api("creating status page", e))?;

        if let Some(id) = created.id.clone() {
            data.set_id(id);
        }
        write_page(data, created);
        Ok(Diagnostics::new())
    }

    fn read(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let id = data.require_id()?.to_string();
        if data.get_bool(PAGE_DELETED)?.unwrap_or(false) {
            return Ok(Diagnostic::warning(format!("Status page {id} is deleted, its workspace is not"))
                .with_detail("Run delete again to remove the workspace.")
                .into());
        }
        match client.get_status_page(&id) {
            Ok(page) => {
                write_page(data, page);
                Ok(Diagnostics::new())
            }
            Err(e) if e.is_unsupported() => {
                warn!("status page {id}: {e}; keeping stored state");
                Ok(Diagnostic::warning("Status page could not be refreshed")
                    .with_detail(format!("{e}. The stored state is kept unchanged."))
                    .into())
            }
            Err(e) if e.is_not_found() => {
                warn!("status page {id} no longer exists, removing from state");
                data.clear_id();
                Ok(Diagnostic::warning(format!("Status page {id} no longer exists")).into())
            }
            Err(e) => Err(ProviderError::api("reading status page", e)),
        }
    }

    fn update(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let id = data.require_id()?.to_string();
        let b = branding(data)?;
        let update = PageUpdate {
            email: data.require_string("email")?,
            name: data.require_string("name")?,
            subdomain: data.require_string("subdomain")?,
            components: Vec::new(),
            logo_url: b.logo_url,
            favicon_url: b.favicon_url,
            google_analytics: b.google_analytics,
            custom_domain: b.custom_domain,
        };

        let updated = client
            .update_status_page(&id, &update)
            .map_err(|e| ProviderError::api("updating status page", e))?;

        data.set("email", updated.email);
        data.set("name", updated.name);
        data.set("subdomain", updated.subdomain);
        write_branding(
            data,
            [
                updated.logo_url,
                updated.favicon_url,
                updated.google_analytics,
                updated.custom_domain,
            ],
        );
        Ok(Diagnostics::new())
    }

    fn delete(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let id = data.require_id()?.to_string();
        let workspace_id = data
            .get_string("workspace_id")?
            .ok_or_else(|| ProviderError::MissingWorkspaceId(id.clone()))?;

        if data.get_bool(PAGE_DELETED)?.unwrap_or(false) {
            client
                .delete_workspace(&workspace_id)
                .map_err(|e| ProviderError::api("deleting workspace", e))?;
        } else if let Err(e) = client.delete_status_page(&id, &workspace_id) {
            if e.failed_step(DELETE_WORKSPACE.name) && !e.failed_step(DELETE_PAGE.name) {
                warn!("status page {id} deleted, workspace {workspace_id} remains");
                data.set(PAGE_DELETED, true);
            }
            return Err(ProviderError::api("deleting status page", e));
        }
        data.clear_id();
        Ok(Diagnostics::new())
    }

    /// Needs the auxiliary read endpoint; fails when it is not configured.
    fn import(&self, client: &InstatusClient, id: &str) -> Result<ResourceData, ProviderError> {
        let page = client
            .get_status_page(id)
            .map_err(|e| ProviderError::api("importing status page", e))?;

        let mut data = ResourceData::with_id(id);
        if page.workspace_id.is_none() {
            data.set("workspace_id", id);
        }
        write_page(&mut data, page);
        Ok(data)
    }
}
