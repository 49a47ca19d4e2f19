//! HTTP fetch layer: turns a change notification into the JSON payload it points at.
//!
//! Each source gets an endpoint template containing `{resource_id}` and, optionally, a bearer
//! token. Obtaining and refreshing tokens is the caller's business.

mod constants;

pub use constants::RESOURCE_PLACEHOLDER;

use std::collections::HashMap;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::coordinator::WebhookNotification;
use crate::core::{EsgError, PayloadFetcher, SourceTag};
use constants::{DEFAULT_OFFICE_GRAPH_ENDPOINT, DEFAULT_SPREADSHEET_ENDPOINT, USER_AGENT};

#[derive(Debug, Clone)]
struct Route {
    template: String,
    bearer: Option<String>,
}

/// A [`PayloadFetcher`] that issues one `GET` per notification.
///
/// Retries are not done here; the coordinator wraps every fetch in its retry policy.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    routes: HashMap<SourceTag, Route>,
}

impl HttpFetcher {
    /// Create a new builder.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::default()
    }

    /// The URL a notification resolves to.
    ///
    /// # Errors
    ///
    /// Returns [`EsgError::UnsupportedSource`] when no endpoint is configured for the source, or
    /// [`EsgError::Url`] when the filled-in template is not a valid URL.
    pub fn resolve(&self, notification: &WebhookNotification) -> Result<Url, EsgError> {
        let route = self.route(&notification.source)?;
        fill(&route.template, &notification.resource_id)
    }

    fn route(&self, source: &SourceTag) -> Result<&Route, EsgError> {
        self.routes
            .get(source)
            .ok_or_else(|| EsgError::UnsupportedSource(source.to_string()))
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, notification), err, fields(source = %notification.source, resource = %notification.resource_id)))]
    async fn get_json(&self, notification: &WebhookNotification) -> Result<Value, EsgError> {
        let route = self.route(&notification.source)?;
        let url = fill(&route.template, &notification.resource_id)?;

        let mut req = self.http.get(url.clone());
        if let Some(token) = &route.bearer {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EsgError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| EsgError::Data(format!("{} payload json parse: {e}", notification.source)))
    }
}

impl PayloadFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        notification: &'a WebhookNotification,
    ) -> BoxFuture<'a, Result<Value, EsgError>> {
        Box::pin(self.get_json(notification))
    }
}

fn fill(template: &str, resource_id: &str) -> Result<Url, EsgError> {
    if resource_id.is_empty() {
        return Err(EsgError::InvalidParams("empty resource id".into()));
    }
    // Percent-encoded as one path segment: `/` becomes `%2F` and a space `%20`.
    let encoded = urlencoding::encode(resource_id);
    Ok(Url::parse(&template.replace(RESOURCE_PLACEHOLDER, &encoded))?)
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct HttpFetcherBuilder {
    user_agent: Option<String>,
    templates: HashMap<SourceTag, String>,
    tokens: HashMap<SourceTag, String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl HttpFetcherBuilder {
    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the endpoint template for a source, e.g.
    /// `https://api.example.com/v3/company/123/invoice/{resource_id}`.
    #[must_use]
    pub fn endpoint(mut self, source: impl Into<SourceTag>, template: impl Into<String>) -> Self {
        self.templates.insert(source.into(), template.into());
        self
    }

    /// Use the public spreadsheet and office-graph endpoints for sources without an explicit
    /// template. The accounting platform has no default because its URL carries a tenant id.
    #[must_use]
    pub fn with_default_endpoints(mut self) -> Self {
        self.templates
            .entry(SourceTag::Spreadsheet)
            .or_insert_with(|| DEFAULT_SPREADSHEET_ENDPOINT.to_string());
        self.templates
            .entry(SourceTag::OfficeGraph)
            .or_insert_with(|| DEFAULT_OFFICE_GRAPH_ENDPOINT.to_string());
        self
    }

    /// Send `Authorization: Bearer <token>` with requests for a source.
    #[must_use]
    pub fn bearer_token(mut self, source: impl Into<SourceTag>, token: impl Into<String>) -> Self {
        self.tokens.insert(source.into(), token.into());
        self
    }

    /// Set a global request timeout (overall). Default: none.
    #[must_use]
    pub const fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub const fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// # Errors
    ///
    /// Returns an error if an endpoint template does not contain `{resource_id}` or does not
    /// form a valid URL, if a token is given for a source without endpoint, or if the HTTP
    /// client cannot be constructed.
    pub fn build(mut self) -> Result<HttpFetcher, EsgError> {
        let mut routes = HashMap::with_capacity(self.templates.len());
        for (source, template) in self.templates {
            if !template.contains(RESOURCE_PLACEHOLDER) {
                return Err(EsgError::InvalidParams(format!(
                    "endpoint for {source} lacks {RESOURCE_PLACEHOLDER}"
                )));
            }
            fill(&template, "probe")?;
            let bearer = self.tokens.remove(&source);
            routes.insert(source, Route { template, bearer });
        }
        if let Some(orphan) = self.tokens.keys().next() {
            return Err(EsgError::InvalidParams(format!(
                "bearer token given for {orphan}, which has no endpoint"
            )));
        }

        let mut httpb =
            reqwest::Client::builder().user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));
        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        Ok(HttpFetcher {
            http: httpb.build()?,
            routes,
        })
    }
}
