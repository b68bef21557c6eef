use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use http::{Method, StatusCode, Uri};
use serde::Serialize;
use tower::Layer;

use crate::pipeline::{Interceptor, Pipeline};

/// Environment variable holding the version reported by the health endpoint
pub const VERSION_ENV: &str = "SERVICE_VERSION";
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Paths answered by the health check
pub const HEALTH_PATHS: [&str; 2] = ["/health", "/"];

#[derive(Debug, Clone, Serialize)]
pub struct HealthPayload {
    pub status: &'static str,
    pub timestamp: String,
    pub service: String,
    pub version: String,
}

impl HealthPayload {
    pub fn now(service: &str) -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            service: service.to_string(),
            version: std::env::var(VERSION_ENV).unwrap_or_else(|_| DEFAULT_VERSION.to_string()),
        }
    }
}

/// Answers `/health` and `/` with a JSON status record
#[derive(Debug, Clone)]
pub struct HealthCheck {
    service: String,
}

impl HealthCheck {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl Interceptor for HealthCheck {
    fn matches(&self, _method: &Method, uri: &Uri) -> bool {
        HEALTH_PATHS.contains(&uri.path())
    }

    fn respond(&self) -> Response {
        (StatusCode::OK, Json(HealthPayload::now(&self.service))).into_response()
    }
}

/// Put a health check in front of `server`
pub fn add_health_check<S>(server: S, check: HealthCheck) -> Pipeline<S> {
    Pipeline::new(server).intercept(check)
}

#[derive(Debug, Clone)]
pub struct HealthCheckLayer {
    check: HealthCheck,
}

impl HealthCheckLayer {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            check: HealthCheck::new(service),
        }
    }
}

impl<S> Layer<S> for HealthCheckLayer {
    type Service = Pipeline<S>;

    fn layer(&self, inner: S) -> Self::Service {
        add_health_check(inner, self.check.clone())
    }
}
