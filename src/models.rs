use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{CfManageError, CfManageResult};

/// Domain used when a route carries no domain name
pub const DEFAULT_DOMAIN: &str = "local";

/// Paginated list wrapper returned by the v3 API
#[derive(Debug, Deserialize)]
pub struct ResourceList<T> {
    pub resources: Vec<T>,
}

impl<T> ResourceList<T> {
    /// Take the first resource, if any
    pub fn into_first(self) -> Option<T> {
        self.resources.into_iter().next()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppDescriptor {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainRef {
    pub name: Option<String>,
}

/// How a deployed app is publicly reachable. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteDescriptor {
    pub url: Option<String>,
    pub host: Option<String>,
    pub domain: Option<DomainRef>,
}

impl RouteDescriptor {
    /// Hostname to advertise: `url`, else `{host}.{domain.name}`, with domain defaulting to `local`
    pub fn hostname(&self) -> CfManageResult<String> {
        if let Some(url) = non_empty(self.url.as_deref()) {
            return Ok(url.to_string());
        }

        let host = non_empty(self.host.as_deref()).ok_or(CfManageError::MissingField("host"))?;
        let domain = non_empty(self.domain.as_ref().and_then(|d| d.name.as_deref()))
            .unwrap_or(DEFAULT_DOMAIN);

        Ok(format!("{}.{}", host, domain))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Connection summary printed after status queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionInfo {
    pub app_url: String,
    pub sse_url: String,
    pub service_key: String,
}

impl ConnectionInfo {
    pub fn new(hostname: &str, service_key: &str) -> Self {
        let app_url = format!("https://{}", hostname);
        Self {
            sse_url: format!("{}/sse", app_url),
            app_url,
            service_key: service_key.to_string(),
        }
    }

    /// Snippet to paste into an MCP client's configuration
    pub fn client_config(&self) -> serde_json::Value {
        json!({
            "mcpServers": {
                self.service_key.as_str(): {
                    "url": self.sse_url,
                }
            }
        })
    }

    pub fn render(&self) -> String {
        let snippet = serde_json::to_string_pretty(&self.client_config())
            .unwrap_or_else(|_| self.client_config().to_string());

        format!(
            "\nConnection Information:\n   Application URL: {}\n   SSE Endpoint: {}\n\nClient Configuration:\n{}",
            self.app_url, self.sse_url, snippet
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn route(json: &str) -> RouteDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_hostname_prefers_url() {
        let r = route(r#"{"url": "myapp.example.com", "host": "ignored", "domain": {"name": "x.com"}}"#);
        assert_eq!(r.hostname().unwrap(), "myapp.example.com");
    }

    #[test]
    fn test_hostname_from_host_and_domain() {
        let r = route(r#"{"host": "myapp", "domain": {"name": "example.com"}}"#);
        assert_eq!(r.hostname().unwrap(), "myapp.example.com");
    }

    #[test]
    fn test_hostname_defaults_domain_to_local() {
        let r = route(r#"{"host": "myapp"}"#);
        assert_eq!(r.hostname().unwrap(), "myapp.local");

        let r = route(r#"{"host": "myapp", "domain": {}}"#);
        assert_eq!(r.hostname().unwrap(), "myapp.local");
    }

    #[test]
    fn test_empty_url_falls_through_to_host() {
        let r = route(r#"{"url": "", "host": "myapp", "domain": {"name": "example.com"}}"#);
        assert_eq!(r.hostname().unwrap(), "myapp.example.com");
    }

    #[test]
    fn test_hostname_without_url_or_host() {
        let r = route(r#"{"domain": {"name": "example.com"}}"#);
        assert!(matches!(r.hostname(), Err(CfManageError::MissingField("host"))));
    }

    #[test]
    fn test_connection_info_urls() {
        let info = ConnectionInfo::new("myapp.example.com", "playwright");
        assert_eq!(info.app_url, "https://myapp.example.com");
        assert_eq!(info.sse_url, "https://myapp.example.com/sse");
        assert_eq!(
            info.client_config()["mcpServers"]["playwright"]["url"],
            "https://myapp.example.com/sse"
        );

        let rendered = info.render();
        assert!(rendered.contains("Application URL: https://myapp.example.com"));
        assert!(rendered.contains("SSE Endpoint: https://myapp.example.com/sse"));
    }

    #[test]
    fn test_resource_list_requires_resources_key() {
        assert!(serde_json::from_str::<ResourceList<AppDescriptor>>("{}").is_err());

        let list: ResourceList<AppDescriptor> =
            serde_json::from_str(r#"{"resources": []}"#).unwrap();
        assert!(list.into_first().is_none());
    }
}
