//! `instatus_component`: a component on a status page.
//!
//! Import ids have the form `<page_id>/<component_id>` since every component
//! endpoint is scoped to its page.

use instatus_core::{Component, ComponentStatus, InstatusClient};
use log::warn;

use crate::data::ResourceData;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ProviderError;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};

pub const TYPE_NAME: &str = "instatus_component";

#[derive(Debug, Default, Clone, Copy)]
pub struct ComponentResource;

fn component_from(data: &ResourceData) -> Result<Component, ProviderError> {
    let status = match data.get_string("status")? {
        Some(s) => s.parse::<ComponentStatus>().map_err(|e| ProviderError::InvalidValue {
            name: "status".to_string(),
            reason: e.to_string(),
        })?,
        None => ComponentStatus::default(),
    };
    let group_id = data.get_string("group_id")?;

    Ok(Component {
        id: data.id().map(str::to_string),
        name: data.require_string("name")?,
        description: data.get_string("description")?.unwrap_or_default(),
        status,
        show_uptime: data.get_bool("show_uptime")?.unwrap_or(true),
        order: data.get_i64("order")?,
        grouped: data.get_bool("grouped")?.unwrap_or(group_id.is_some()),
        group_id,
        group_name: None,
        archived: data.get_bool("archived")?.unwrap_or(false),
        unique_email: None,
        translations: data.get_map("translations")?,
    })
}

/// `group_name` is only overwritten when `with_group_name` is set, since the
/// create response never carries it.
fn write_component(data: &mut ResourceData, component: Component, with_group_name: bool) {
    data.set("name", component.name);
    data.set("description", component.description);
    data.set("status", component.status.as_str());
    data.set("show_uptime", component.show_uptime);
    data.set_opt("order", component.order);
    data.set("grouped", component.grouped);
    data.set_opt("group_id", component.group_id);
    data.set("archived", component.archived);
    data.set_opt("unique_email", component.unique_email);
    data.set_opt("translations", component.translations);
    if with_group_name {
        data.set_opt("group_name", component.group_name);
    }
}

impl Resource for ComponentResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with(
                "page_id",
                Attribute::required(AttributeType::String, "Status page the component belongs to"),
            )
            .with("name", Attribute::required(AttributeType::String, "Component name"))
            .with("description", Attribute::optional(AttributeType::String, "Component description"))
            .with(
                "status",
                Attribute::optional_computed(
                    AttributeType::String,
                    "One of OPERATIONAL, UNDERMAINTENANCE, DEGRADEDPERFORMANCE, PARTIALOUTAGE, MAJOROUTAGE",
                ),
            )
            .with(
                "show_uptime",
                Attribute::optional_computed(AttributeType::Bool, "Show uptime on the status page"),
            )
            .with(
                "order",
                Attribute::optional_computed(AttributeType::Int, "Display order on the page"),
            )
            .with(
                "grouped",
                Attribute::optional_computed(AttributeType::Bool, "Whether the component sits in a group"),
            )
            .with(
                "group_id",
                Attribute::optional(AttributeType::String, "Identifier of the component acting as group"),
            )
            .with(
                "group_name",
                Attribute::computed(AttributeType::String, "Name of the group, for display"),
            )
            .with("archived", Attribute::optional(AttributeType::Bool, "Hide the component"))
            .with(
                "unique_email",
                Attribute::computed(AttributeType::String, "Email address that updates the component"),
            )
            .with(
                "translations",
                Attribute::optional(AttributeType::Map, "Per-locale name and description"),
            )
    }

    fn create(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let page_id = data.require_string("page_id")?;
        let component = component_from(data)?;

        let created = client
            .create_component(&page_id, &component)
            .map_err(|e| ProviderError::api("creating component", e))?;

        if let Some(id) = created.id.clone() {
            data.set_id(id);
        }
        write_component(data, created, false);
        Ok(Diagnostics::new())
    }

    fn read(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let id = data.require_id()?.to_string();
        let page_id = data.require_string("page_id")?;

        match client.get_component(&page_id, &id) {
            Ok(component) => {
                write_component(data, component, true);
                Ok(Diagnostics::new())
            }
            Err(e) if e.is_not_found() => {
                warn!("component {id} no longer exists, removing from state");
                data.clear_id();
                Ok(Diagnostic::warning(format!("Component {id} no longer exists")).into())
            }
            Err(e) => Err(ProviderError::api("reading component", e)),
        }
    }

    fn update(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let id = data.require_id()?.to_string();
        let page_id = data.require_string("page_id")?;
        let component = component_from(data)?;

        let updated = client
            .update_component(&page_id, &id, &component)
            .map_err(|e| ProviderError::api("updating component", e))?;

        write_component(data, updated, true);
        Ok(Diagnostics::new())
    }

    fn delete(&self, client: &InstatusClient, data: &mut ResourceData) -> Result<Diagnostics, ProviderError> {
        let id = data.require_id()?.to_string();
        let page_id = data.require_string("page_id")?;

        client
            .delete_component(&page_id, &id)
            .map_err(|e| ProviderError::api("deleting component", e))?;
        data.clear_id();
        Ok(Diagnostics::new())
    }

    fn import(&self, client: &InstatusClient, id: &str) -> Result<ResourceData, ProviderError> {
        let (page_id, component_id) = id
            .split_once('/')
            .filter(|(page, component)| !page.is_empty() && !component.is_empty())
            .ok_or_else(|| ProviderError::InvalidImportId {
                id: id.to_string(),
                expected: "<page_id>/<component_id>",
            })?;

        let component = client
            .get_component(page_id, component_id)
            .map_err(|e| ProviderError::api("importing component", e))?;

        let mut data = ResourceData::with_id(component_id);
        data.set("page_id", page_id);
        write_component(&mut data, component, true);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_for_unset_attributes() {
        let data = ResourceData::from_json(json!({ "page_id": "p1", "name": "API" })).unwrap();
        let c = component_from(&data).unwrap();
        assert_eq!(c.status, ComponentStatus::Operational);
        assert!(c.show_uptime);
        assert!(!c.grouped);
        assert_eq!(c.description, "");
    }

    #[test]
    fn group_id_implies_grouped() {
        let data = ResourceData::from_json(json!({ "page_id": "p1", "name": "API", "group_id": "g1" })).unwrap();
        let c = component_from(&data).unwrap();
        assert!(c.grouped);
        assert_eq!(c.group_id.as_deref(), Some("g1"));
    }

    #[test]
    fn invalid_status_is_rejected() {
        let data = ResourceData::from_json(json!({ "page_id": "p1", "name": "API", "status": "DOWN" })).unwrap();
        let err = component_from(&data).unwrap_err();
        assert_eq!(err.attribute(), Some("status"));
    }

    #[test]
    fn import_id_must_have_two_parts() {
        let client = InstatusClient::new(instatus_core::ClientConfig::new("k").with_base_url("http://127.0.0.1:9"));
        for bad in ["c1", "/c1", "p1/"] {
            let err = ComponentResource.import(&client, bad).unwrap_err();
            assert!(matches!(err, ProviderError::InvalidImportId { .. }), "{bad}");
        }
    }
}
