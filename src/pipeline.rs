//! Request pipeline: an ordered list of interceptors in front of a default service.
//!
//! The first interceptor whose predicate matches answers the request directly and the
//! default service never sees it. Everything else is forwarded to the default service
//! untouched.

use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use http::{Method, Request, Uri};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

/// A handler that may short-circuit a request
pub trait Interceptor: Send + Sync + 'static {
    fn matches(&self, method: &Method, uri: &Uri) -> bool;
    fn respond(&self) -> Response;
}

pub struct Pipeline<S> {
    interceptors: Arc<Vec<Arc<dyn Interceptor>>>,
    inner: S,
}

impl<S: Clone> Clone for Pipeline<S> {
    fn clone(&self) -> Self {
        Self {
            interceptors: Arc::clone(&self.interceptors),
            inner: self.inner.clone(),
        }
    }
}

impl<S> Pipeline<S> {
    pub fn new(inner: S) -> Self {
        Self {
            interceptors: Arc::new(Vec::new()),
            inner,
        }
    }

    /// Append an interceptor; earlier ones win
    pub fn intercept(mut self, interceptor: impl Interceptor) -> Self {
        let mut interceptors: Vec<_> = self.interceptors.iter().cloned().collect();
        interceptors.push(Arc::new(interceptor));
        self.interceptors = Arc::new(interceptors);
        self
    }

    fn find(&self, method: &Method, uri: &Uri) -> Option<&Arc<dyn Interceptor>> {
        self.interceptors.iter().find(|i| i.matches(method, uri))
    }
}

impl<S, B> Service<Request<B>> for Pipeline<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        if let Some(interceptor) = self.find(req.method(), req.uri()) {
            let response = interceptor.respond();
            return Box::pin(async move { Ok(response) });
        }

        // Use the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let fut = inner.call(req);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::{routing::get, Router};
    use hyper::Body;
    use tower::ServiceExt;

    struct Teapot(&'static str);

    impl Interceptor for Teapot {
        fn matches(&self, _method: &Method, uri: &Uri) -> bool {
            uri.path() == self.0
        }

        fn respond(&self) -> Response {
            (http::StatusCode::IM_A_TEAPOT, self.0).into_response()
        }
    }

    async fn body_string(resp: Response) -> String {
        let bytes = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_first_matching_interceptor_wins() {
        let router: Router = Router::new().route("/a", get(|| async { "router" }));
        let pipeline = Pipeline::new(router)
            .intercept(Teapot("/a"))
            .intercept(Teapot("/a"));

        let resp = pipeline.oneshot(request("/a")).await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::IM_A_TEAPOT);
        assert_eq!(body_string(resp).await, "/a");
    }

    #[tokio::test]
    async fn test_unmatched_request_falls_through() {
        let router: Router = Router::new().route("/b", get(|| async { "router" }));
        let pipeline = Pipeline::new(router).intercept(Teapot("/a"));

        let resp = pipeline.clone().oneshot(request("/b")).await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(body_string(resp).await, "router");

        let resp = pipeline.oneshot(request("/missing")).await.unwrap();
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }
}
