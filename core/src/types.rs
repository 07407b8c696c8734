//! Domain entities and the wire DTOs they map to.
//!
//! # Design
//! The Instatus API uses a different JSON shape per direction: a component's
//! group is sent as `group` on create, as `groupId` on update, and comes back
//! as `groupId` plus an optional nested `group` object. Page creation returns
//! only identifiers, and page updates return the name wrapped in a locale
//! object. Domain types (`Component`, `Page`, `PageUpdate`) stay flat; each
//! direction gets its own DTO so no single struct has to carry two spellings
//! of the same field.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Component status as defined by the remote API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentStatus {
    #[default]
    Operational,
    UnderMaintenance,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
    /// A status this client does not know yet. Only ever read from responses;
    /// `FromStr` never produces it.
    #[serde(other)]
    Unknown,
}

impl ComponentStatus {
    pub const ALL: [ComponentStatus; 5] = [
        ComponentStatus::Operational,
        ComponentStatus::UnderMaintenance,
        ComponentStatus::DegradedPerformance,
        ComponentStatus::PartialOutage,
        ComponentStatus::MajorOutage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentStatus::Operational => "OPERATIONAL",
            ComponentStatus::UnderMaintenance => "UNDERMAINTENANCE",
            ComponentStatus::DegradedPerformance => "DEGRADEDPERFORMANCE",
            ComponentStatus::PartialOutage => "PARTIALOUTAGE",
            ComponentStatus::MajorOutage => "MAJOROUTAGE",
            ComponentStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown component status {0:?}, expected one of OPERATIONAL, UNDERMAINTENANCE, DEGRADEDPERFORMANCE, PARTIALOUTAGE, MAJOROUTAGE")]
pub struct UnknownStatus(pub String);

impl FromStr for ComponentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A monitored unit shown on a status page.
///
/// `group_name` and `unique_email` are filled from server responses only and
/// are never sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub status: ComponentStatus,
    pub show_uptime: bool,
    pub order: Option<i64>,
    pub grouped: bool,
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub archived: bool,
    pub unique_email: Option<String>,
    pub translations: Option<Map<String, Value>>,
}

/// Body of `POST /v1/{page}/components`, also embedded in page creation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCreateRequest {
    pub name: String,
    pub description: String,
    pub status: ComponentStatus,
    pub show_uptime: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub grouped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Map<String, Value>>,
}

impl From<&Component> for ComponentCreateRequest {
    fn from(c: &Component) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            status: c.status,
            show_uptime: c.show_uptime,
            order: c.order,
            grouped: c.grouped,
            group: c.group_id.clone(),
            archived: c.archived,
            translations: c.translations.clone(),
        }
    }
}

/// Body of `PUT /v2/{page}/components/{id}`.
///
/// Full replace: `groupId` is always sent, `null` removes the component from
/// its group.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUpdateRequest {
    pub name: String,
    pub description: String,
    pub status: ComponentStatus,
    pub show_uptime: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub grouped: bool,
    pub group_id: Option<String>,
    pub archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translations: Option<Map<String, Value>>,
}

impl From<&Component> for ComponentUpdateRequest {
    fn from(c: &Component) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            status: c.status,
            show_uptime: c.show_uptime,
            order: c.order,
            grouped: c.grouped,
            group_id: c.group_id.clone(),
            archived: c.archived,
            translations: c.translations.clone(),
        }
    }
}

/// The `group` field of a component response: a nested object on reads,
/// occasionally a bare identifier.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GroupField {
    Nested(GroupRef),
    Id(String),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GroupRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Component as returned by create, get and update.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentResponse {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ComponentStatus,
    #[serde(default)]
    pub show_uptime: bool,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub grouped: bool,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub group: Option<GroupField>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub unique_email: Option<String>,
    #[serde(default)]
    pub translations: Option<Map<String, Value>>,
}

impl ComponentResponse {
    /// Flatten into a `Component`. The group name is only taken from the
    /// nested group object when `with_group_name` is set.
    pub fn into_component(self, with_group_name: bool) -> Component {
        let (nested_id, nested_name) = match self.group {
            Some(GroupField::Nested(group)) => (group.id, group.name),
            Some(GroupField::Id(id)) => (Some(id), None),
            None => (None, None),
        };
        Component {
            id: Some(self.id),
            name: self.name,
            description: self.description.unwrap_or_default(),
            status: self.status,
            show_uptime: self.show_uptime,
            order: self.order,
            grouped: self.grouped,
            group_id: self.group_id.or(nested_id),
            group_name: if with_group_name { nested_name } else { None },
            archived: self.archived,
            unique_email: self.unique_email,
            translations: self.translations,
        }
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// A status page and the workspace that owns it.
///
/// After creation `id` holds the identifier the API returned, which is the
/// workspace identifier. `workspace_id` records it separately so deletion can
/// remove the workspace as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub id: Option<String>,
    pub workspace_id: Option<String>,
    pub workspace_slug: Option<String>,
    pub email: String,
    pub name: String,
    pub subdomain: String,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub google_analytics: Option<String>,
    pub custom_domain: Option<String>,
    pub components: Vec<Component>,
}

/// Body of `POST /v1/pages`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageCreateRequest {
    pub email: String,
    pub name: String,
    pub subdomain: String,
    pub components: Vec<ComponentCreateRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_analytics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
}

impl From<&Page> for PageCreateRequest {
    fn from(p: &Page) -> Self {
        Self {
            email: p.email.clone(),
            name: p.name.clone(),
            subdomain: p.subdomain.clone(),
            components: p.components.iter().map(ComponentCreateRequest::from).collect(),
            logo_url: p.logo_url.clone(),
            favicon_url: p.favicon_url.clone(),
            google_analytics: p.google_analytics.clone(),
            custom_domain: p.custom_domain.clone(),
        }
    }
}

/// Response of `POST /v1/pages`. Nothing else is returned.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageCreateResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub workspace_slug: Option<String>,
}

/// Desired state sent by `PUT /v2/{page}` and the echoed result.
///
/// An empty `components` list is left out of the request so a page update
/// never touches the page's components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageUpdate {
    pub email: String,
    pub name: String,
    pub subdomain: String,
    pub components: Vec<Component>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub google_analytics: Option<String>,
    pub custom_domain: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdateRequest {
    pub email: String,
    pub name: String,
    pub subdomain: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentUpdateRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_analytics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domain: Option<String>,
}

impl From<&PageUpdate> for PageUpdateRequest {
    fn from(p: &PageUpdate) -> Self {
        Self {
            email: p.email.clone(),
            name: p.name.clone(),
            subdomain: p.subdomain.clone(),
            components: p.components.iter().map(ComponentUpdateRequest::from).collect(),
            logo_url: p.logo_url.clone(),
            favicon_url: p.favicon_url.clone(),
            google_analytics: p.google_analytics.clone(),
            custom_domain: p.custom_domain.clone(),
        }
    }
}

/// A page name, either plain or keyed by locale.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LocalizedName {
    Plain(String),
    Localized {
        #[serde(default)]
        default: Option<String>,
        #[serde(default)]
        en: Option<String>,
    },
}

impl LocalizedName {
    /// The `default` locale, falling back to `en`.
    pub fn canonical(&self) -> Option<&str> {
        match self {
            LocalizedName::Plain(name) => Some(name.as_str()),
            LocalizedName::Localized { default, en } => default.as_deref().or(en.as_deref()),
        }
    }
}

/// Response of `PUT /v2/{page}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdateResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub name: Option<LocalizedName>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub google_analytics: Option<String>,
    #[serde(default)]
    pub custom_domain: Option<String>,
}

/// Response of the auxiliary page-read endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageReadResponse {
    pub id: String,
    #[serde(default)]
    pub workspace_id: Option<String>,
    #[serde(default)]
    pub workspace_slug: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<LocalizedName>,
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub favicon_url: Option<String>,
    #[serde(default)]
    pub google_analytics: Option<String>,
    #[serde(default)]
    pub custom_domain: Option<String>,
}

impl From<PageReadResponse> for Page {
    fn from(r: PageReadResponse) -> Self {
        let name = r
            .name
            .as_ref()
            .and_then(LocalizedName::canonical)
            .unwrap_or_default()
            .to_string();
        Page {
            id: Some(r.id),
            workspace_id: r.workspace_id,
            workspace_slug: r.workspace_slug,
            email: r.email.unwrap_or_default(),
            name,
            subdomain: r.subdomain.unwrap_or_default(),
            logo_url: r.logo_url,
            favicon_url: r.favicon_url,
            google_analytics: r.google_analytics,
            custom_domain: r.custom_domain,
            components: Vec::new(),
        }
    }
}
