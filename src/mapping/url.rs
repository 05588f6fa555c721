// Canonical resource URL synthesis

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::constants::routes;
use crate::core::errors::CampError;

/// Identity chain of an addressable resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Camp { camp_id: i32 },
    Speaker { camp_id: i32, speaker_id: i32 },
    Talk { camp_id: i32, speaker_id: i32, talk_id: i32 },
}

impl ResourceRef {
    /// Name of the route that serves this resource
    pub fn route_name(&self) -> &'static str {
        match self {
            ResourceRef::Camp { .. } => routes::CAMP_GET,
            ResourceRef::Speaker { .. } => routes::SPEAKER_GET,
            ResourceRef::Talk { .. } => routes::TALK_GET,
        }
    }

    fn params(&self) -> Vec<(&'static str, i32)> {
        match *self {
            ResourceRef::Camp { camp_id } => vec![("camp_id", camp_id)],
            ResourceRef::Speaker { camp_id, speaker_id } => {
                vec![("camp_id", camp_id), ("speaker_id", speaker_id)]
            }
            ResourceRef::Talk { camp_id, speaker_id, talk_id } => vec![
                ("camp_id", camp_id),
                ("speaker_id", speaker_id),
                ("talk_id", talk_id),
            ],
        }
    }
}

/// Produces an absolute URL for a resource
pub trait UrlResolver: Send + Sync {
    fn resolve(&self, resource: &ResourceRef) -> Result<String, CampError>;
}

/// Where the current request arrived, as seen by the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteContext {
    pub scheme: Option<String>,
    /// Host, with port when non-default
    pub host: Option<String>,
    /// Prefix prepended to every route path, without trailing slash
    pub path_base: String,
}

impl RouteContext {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            host: Some(host.into()),
            path_base: String::new(),
        }
    }

    /// Fixed context taken from a configured public base URL
    pub fn from_base_url(base: &url::Url) -> Self {
        let host = base.host_str().map(|host| match base.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        });
        Self {
            scheme: Some(base.scheme().to_string()),
            host,
            path_base: base.path().trim_end_matches('/').to_string(),
        }
    }
}

/// Named route templates, e.g. `CampGet -> /api/camps/{camp_id}`
#[derive(Debug, Clone)]
pub struct RouteTable {
    templates: HashMap<&'static str, &'static str>,
}

impl RouteTable {
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn with_route(mut self, name: &'static str, template: &'static str) -> Self {
        self.templates.insert(name, template);
        self
    }

    pub fn template(&self, name: &str) -> Option<&'static str> {
        self.templates.get(name).copied()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::empty()
            .with_route(routes::CAMP_GET, routes::CAMP_TEMPLATE)
            .with_route(routes::SPEAKER_GET, routes::SPEAKER_TEMPLATE)
            .with_route(routes::TALK_GET, routes::TALK_TEMPLATE)
    }
}

/// `UrlResolver` over a route table and one request's context
#[derive(Debug, Clone)]
pub struct RouteLinker {
    table: Arc<RouteTable>,
    context: RouteContext,
}

impl RouteLinker {
    pub fn new(table: Arc<RouteTable>, context: RouteContext) -> Self {
        Self { table, context }
    }

    pub fn context(&self) -> &RouteContext {
        &self.context
    }

    /// Scheme and host of the context, or why links cannot be built
    ///
    /// Write handlers call this before storing anything.
    pub fn origin(&self) -> Result<(&str, &str), CampError> {
        let scheme = self
            .context
            .scheme
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CampError::ResolutionFailure("request scheme unavailable".to_string()))?;
        let host = self
            .context
            .host
            .as_deref()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CampError::ResolutionFailure("request host unavailable".to_string()))?;
        Ok((scheme, host))
    }
}

impl UrlResolver for RouteLinker {
    fn resolve(&self, resource: &ResourceRef) -> Result<String, CampError> {
        let (scheme, host) = self.origin()?;

        let route_name = resource.route_name();
        let template = self.table.template(route_name).ok_or_else(|| {
            CampError::ResolutionFailure(format!("unknown route '{}'", route_name))
        })?;

        let mut path = template.to_string();
        for (param, value) in resource.params() {
            path = path.replace(&format!("{{{}}}", param), &value.to_string());
        }
        if path.contains('{') {
            return Err(CampError::ResolutionFailure(format!(
                "route '{}' has unbound parameters",
                route_name
            )));
        }

        Ok(format!("{}://{}{}{}", scheme, host, self.context.path_base, path))
    }
}
