//! # HTTP Telemetry Library
//!
//! Request-scoped observability for Orderflow actix services: in-flight
//! lifecycle tracking with exactly-once exit accounting, per-request
//! correlation identifiers, Prometheus metric families, structured JSON
//! logging, and causal trace propagation across service hops.
//!
//! ## Modules
//! - `telemetry`: per-process observability context
//! - `lifecycle`: request lifecycle tracker middleware
//! - `metrics`: Prometheus metric families and text exposition
//! - `correlation`: per-request log correlation identifiers
//! - `trace`: causal trace context and its wire format
//! - `client`: outbound call wrapper with context propagation
//! - `logging`: JSON log subscriber setup

pub mod client;
pub mod correlation;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod telemetry;
pub mod trace;

pub use client::{DownstreamClient, DownstreamReply, OutboundError};
pub use lifecycle::{RequestContext, RequestTracker};
pub use logging::{init_tracing, level_for_status};
pub use metrics::{serve_metrics, status_class, HttpMetrics};
pub use telemetry::Telemetry;
pub use trace::{TraceContext, TRACE_CONTEXT_HEADER};
