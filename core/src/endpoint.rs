//! Per-operation endpoint descriptors.
//!
//! The Instatus API mixes versions (`/v1` creates and deletes, `/v2` reads and
//! updates) and the page-read endpoint lives on a different host with a
//! different auth header. Each operation is therefore a constant `Endpoint`
//! instead of a hard-coded `format!` at the call site.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpMethod;

/// API version prefix of an endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    pub fn prefix(self) -> &'static str {
        match self {
            ApiVersion::V1 => "/v1",
            ApiVersion::V2 => "/v2",
        }
    }
}

/// How a request proves who it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `authorization: Bearer <key>`
    Bearer,
    /// `x-api-key: <key>`
    ApiKey,
}

impl AuthScheme {
    pub fn header(self, api_key: &str) -> (String, String) {
        match self {
            AuthScheme::Bearer => ("authorization".to_string(), format!("Bearer {api_key}")),
            AuthScheme::ApiKey => ("x-api-key".to_string(), api_key.to_string()),
        }
    }
}

/// Which server an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFamily {
    /// The public REST API at `ClientConfig::base_url`.
    Primary,
    /// The page-read endpoint at `ClientConfig::aux_base_url`, if any.
    Auxiliary,
}

impl EndpointFamily {
    pub fn auth(self) -> AuthScheme {
        match self {
            EndpointFamily::Primary => AuthScheme::Bearer,
            EndpointFamily::Auxiliary => AuthScheme::ApiKey,
        }
    }
}

/// Method, server, version and path template of one API operation.
///
/// Templates contain `{name}` placeholders filled by `Endpoint::url`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: HttpMethod,
    pub family: EndpointFamily,
    pub version: ApiVersion,
    pub template: &'static str,
}

pub const CREATE_COMPONENT: Endpoint = Endpoint {
    name: "create component",
    method: HttpMethod::Post,
    family: EndpointFamily::Primary,
    version: ApiVersion::V1,
    template: "/{page_id}/components",
};

pub const GET_COMPONENT: Endpoint = Endpoint {
    name: "get component",
    method: HttpMethod::Get,
    family: EndpointFamily::Primary,
    version: ApiVersion::V2,
    template: "/{page_id}/components/{component_id}",
};

pub const UPDATE_COMPONENT: Endpoint = Endpoint {
    name: "update component",
    method: HttpMethod::Put,
    family: EndpointFamily::Primary,
    version: ApiVersion::V2,
    template: "/{page_id}/components/{component_id}",
};

pub const DELETE_COMPONENT: Endpoint = Endpoint {
    name: "delete component",
    method: HttpMethod::Delete,
    family: EndpointFamily::Primary,
    version: ApiVersion::V1,
    template: "/{page_id}/components/{component_id}",
};

pub const CREATE_PAGE: Endpoint = Endpoint {
    name: "create page",
    method: HttpMethod::Post,
    family: EndpointFamily::Primary,
    version: ApiVersion::V1,
    template: "/pages",
};

pub const GET_PAGE: Endpoint = Endpoint {
    name: "get page",
    method: HttpMethod::Get,
    family: EndpointFamily::Auxiliary,
    version: ApiVersion::V1,
    template: "/pages/{page_id}",
};

pub const UPDATE_PAGE: Endpoint = Endpoint {
    name: "update page",
    method: HttpMethod::Put,
    family: EndpointFamily::Primary,
    version: ApiVersion::V2,
    template: "/{page_id}",
};

pub const DELETE_PAGE: Endpoint = Endpoint {
    name: "delete page",
    method: HttpMethod::Delete,
    family: EndpointFamily::Primary,
    version: ApiVersion::V2,
    template: "/{page_id}",
};

pub const DELETE_WORKSPACE: Endpoint = Endpoint {
    name: "delete workspace",
    method: HttpMethod::Delete,
    family: EndpointFamily::Primary,
    version: ApiVersion::V1,
    template: "/workspaces/{workspace_id}",
};

impl Endpoint {
    /// Absolute URL for this endpoint with every `{name}` replaced.
    ///
    /// Values are percent-encoded as single path segments and the template is
    /// rendered in one pass, so a value can neither add segments nor expand
    /// another placeholder. Fails with `Unsupported` when the endpoint's
    /// family has no base URL configured, with `MissingIdentifier` when a
    /// parameter is empty or absent, and with `InvalidIdentifier` for `.`
    /// and `..`.
    pub fn url(&self, config: &ClientConfig, params: &[(&'static str, &str)]) -> Result<String, ApiError> {
        let base = match self.family {
            EndpointFamily::Primary => config.base_url.as_str(),
            EndpointFamily::Auxiliary => config
                .aux_base_url
                .as_deref()
                .ok_or_else(|| ApiError::Unsupported(self.name.to_string()))?,
        };

        Ok(format!("{base}{}{}", self.version.prefix(), render(self.template, params)?))
    }

    pub fn auth(&self) -> AuthScheme {
        self.family.auth()
    }
}

fn render(template: &'static str, params: &[(&'static str, &str)]) -> Result<String, ApiError> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((literal, tail)) = rest.split_once('{') {
        path.push_str(literal);
        let (name, tail) = tail.split_once('}').unwrap_or((tail, ""));
        let value = params
            .iter()
            .find(|(param, _)| *param == name)
            .map(|&(_, value)| value)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ApiError::MissingIdentifier(name))?;
        if value == "." || value == ".." {
            return Err(ApiError::InvalidIdentifier {
                name,
                value: value.to_string(),
            });
        }
        path.push_str(&urlencoding::encode(value));
        rest = tail;
    }
    path.push_str(rest);
    Ok(path)
}
