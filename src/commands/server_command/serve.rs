use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use hyper::client::HttpConnector;
use hyper::service::make_service_fn;
use hyper::{Body, Client, Request, Server, Uri};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

use crate::config::ServerConfig;
use crate::health::{add_health_check, HealthCheck};
use crate::pipeline::Pipeline;

/// Shared state for the upstream proxy
pub struct ProxyState {
    pub client: Client<HttpConnector>,
    pub upstream: Uri,
}

/// Build the request pipeline: health check first, then the proxy or a 404 fallback
pub fn build_service(config: &ServerConfig) -> Result<Pipeline<Router>> {
    let router = match &config.upstream {
        Some(upstream) => {
            let upstream: Uri = upstream
                .parse()
                .context(format!("Invalid upstream URL: {}", upstream))?;
            let state = Arc::new(ProxyState {
                client: Client::new(),
                upstream,
            });
            Router::new().fallback(proxy_to_upstream).with_state(state)
        }
        None => Router::new().fallback(not_found),
    };

    let router = router.layer(TraceLayer::new_for_http());

    Ok(add_health_check(
        router,
        HealthCheck::new(config.service_name.clone()),
    ))
}

/// Serve the health-checked pipeline until Ctrl+C
#[instrument]
pub async fn execute(config: ServerConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context(format!(
            "Invalid host or port: {}:{}",
            config.host, config.port
        ))?;

    let service = build_service(&config)?;

    let make_svc = make_service_fn(move |_conn| {
        let service = service.clone();
        async move { Ok::<_, Infallible>(service) }
    });

    let server = Server::try_bind(&addr)
        .context(format!("Failed to bind {}", addr))?
        .serve(make_svc);

    info!("Starting health-checked server on http://{}", addr);
    match &config.upstream {
        Some(upstream) => println!("Serving http://{} -> {}", addr, upstream),
        None => println!("Serving http://{} (health check only)", addr),
    }
    println!("Press Ctrl+C to stop");

    tokio::select! {
        result = server => {
            result.context("Server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Shutting down...");
        }
    }

    Ok(())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Forward a request to the upstream, keeping path and query
async fn proxy_to_upstream(
    State(state): State<Arc<ProxyState>>,
    req: Request<Body>,
) -> Response {
    match forward(&state, req).await {
        Ok(resp) => resp.into_response(),
        Err(e) => {
            error!("Proxy error: {:#}", e);
            (StatusCode::BAD_GATEWAY, format!("Proxy error: {}", e)).into_response()
        }
    }
}

async fn forward(state: &ProxyState, req: Request<Body>) -> Result<hyper::Response<Body>> {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or("/");

    let mut parts = state.upstream.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse()?);
    let uri = Uri::from_parts(parts).context("Failed to build upstream URI")?;

    let (parts, body) = req.into_parts();
    let mut new_req = Request::builder().method(parts.method).uri(uri);

    // Copy headers
    for (name, value) in parts.headers.iter() {
        if name != "host" {
            new_req = new_req.header(name, value);
        }
    }

    if let Some(host) = parts.headers.get("host") {
        new_req = new_req.header("X-Forwarded-Host", host);
    }
    new_req = new_req.header("X-Forwarded-Proto", "http");

    let new_req = new_req.body(body).context("Failed to build request")?;

    state
        .client
        .request(new_req)
        .await
        .context("Proxy request failed")
}
