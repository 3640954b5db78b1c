//! Request Lifecycle Tracker.
//!
//! Wraps every inbound request (liveness and metrics-scrape paths excepted)
//! with exactly-once entry/exit accounting. Two terminal signals exist: the
//! wrapped service future resolving (a response was produced) and the future
//! being dropped before it resolves (the client went away). On a normal
//! response both fire, completion first; the one-shot latch guarantees a
//! single gauge decrement and a single terminal emission either way.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use tracing::{Instrument, Level};

use crate::correlation::correlation_id;
use crate::logging::level_for_status;
use crate::metrics::{status_class, HttpMetrics, UNMATCHED_PATH};
use crate::telemetry::Telemetry;
use crate::trace::{TraceContext, TRACE_CONTEXT_HEADER};

/// Low-value paths excluded from lifecycle accounting.
const EXEMPT_PATHS: &[&str] = &["/health", "/metrics"];

/// Per-request observability state, created on entry and owned by the
/// request-handling task for the request's duration.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
    pub trace: TraceContext,
    pub method: String,
    pub path: String,
    pub started_at: Instant,
}

impl RequestContext {
    fn new(method: String, path: String, trace: TraceContext) -> Self {
        Self {
            correlation_id: correlation_id(),
            trace,
            method,
            path,
            started_at: Instant::now(),
        }
    }

    /// Context for a request the tracker did not wrap. Keeps a correlation
    /// identifier attached to every log line even on untracked paths and in
    /// early-failure branches.
    pub fn detached(method: &str, path: &str) -> Self {
        Self::new(method.to_owned(), path.to_owned(), TraceContext::new_root())
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let ctx = req
            .extensions()
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(|| RequestContext::detached(req.method().as_str(), req.path()));
        ready(Ok(ctx))
    }
}

/// Middleware factory for the lifecycle tracker.
pub struct RequestTracker {
    telemetry: Arc<Telemetry>,
}

impl RequestTracker {
    pub fn new(telemetry: Arc<Telemetry>) -> Self {
        Self { telemetry }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTracker
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTrackerService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTrackerService {
            service: Rc::new(service),
            telemetry: self.telemetry.clone(),
        }))
    }
}

pub struct RequestTrackerService<S> {
    service: Rc<S>,
    telemetry: Arc<Telemetry>,
}

impl<S, B> Service<ServiceRequest> for RequestTrackerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if EXEMPT_PATHS.contains(&req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let method = req.method().to_string();
        let path = req.path().to_string();

        let trace = req
            .headers()
            .get(TRACE_CONTEXT_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(TraceContext::parse)
            .map(|inbound| inbound.child())
            .unwrap_or_else(TraceContext::new_root);

        let ctx = RequestContext::new(method.clone(), path.clone(), trace);
        req.extensions_mut().insert(ctx.clone());

        let span = tracing::info_span!(
            "http_request",
            service = %self.telemetry.service(),
            environment = %self.telemetry.environment(),
            correlation_id = %ctx.correlation_id,
            trace_id = %trace.trace_id_hex(),
            span_id = %trace.span_id_hex(),
            parent_span_id = %trace.parent_span_id_hex().unwrap_or_default(),
            method = %method,
            path = %path,
        );

        let guard = LifecycleGuard::enter(self.telemetry.http().clone(), ctx);
        span.in_scope(|| tracing::info!("request received"));

        let fut = self.service.call(req);
        Box::pin(
            async move {
                match fut.await {
                    Ok(res) => {
                        let path_label = res
                            .request()
                            .match_pattern()
                            .unwrap_or_else(|| UNMATCHED_PATH.to_owned());
                        guard.complete(res.status(), &path_label);
                        Ok(res)
                    }
                    Err(err) => {
                        let status = err.as_response_error().status_code();
                        guard.complete(status, &path);
                        Err(err)
                    }
                }
            }
            .instrument(span),
        )
    }
}

/// One-shot exit accounting for a tracked request.
///
/// `enter` increments the in-flight gauge. Exactly one of `complete` (a
/// response was produced) or `Drop` (the request future was discarded before
/// a response) decrements it; the latch is checked and set in a single
/// atomic swap with no suspension point in between.
struct LifecycleGuard {
    metrics: HttpMetrics,
    ctx: RequestContext,
    finished: AtomicBool,
}

impl LifecycleGuard {
    fn enter(metrics: HttpMetrics, ctx: RequestContext) -> Self {
        metrics.requests_in_flight.inc();
        Self {
            metrics,
            ctx,
            finished: AtomicBool::new(false),
        }
    }

    fn complete(&self, status: StatusCode, path_label: &str) {
        if self.finished.swap(true, Ordering::AcqRel) {
            return;
        }
        self.metrics.requests_in_flight.dec();

        let elapsed = self.ctx.started_at.elapsed();
        let status = status.as_u16();
        self.metrics.observe_completed(
            &self.ctx.method,
            path_label,
            status_class(status),
            elapsed.as_secs_f64(),
        );

        let correlation_id = self.ctx.correlation_id.as_str();
        let duration_ms = elapsed.as_millis() as u64;
        match level_for_status(status) {
            Level::ERROR => {
                tracing::error!(correlation_id, status, duration_ms, "request completed")
            }
            Level::WARN => {
                tracing::warn!(correlation_id, status, duration_ms, "request completed")
            }
            _ => tracing::info!(correlation_id, status, duration_ms, "request completed"),
        }
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        if self.finished.swap(true, Ordering::AcqRel) {
            return;
        }
        self.metrics.requests_in_flight.dec();
        tracing::warn!(
            correlation_id = %self.ctx.correlation_id,
            method = %self.ctx.method,
            path = %self.ctx.path,
            "request aborted by client before completion"
        );
    }
}
