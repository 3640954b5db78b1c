//! Outbound call wrapper for the next hop in the chain.
//!
//! Carries the caller's trace context forward so the receiving service
//! continues the same trace. Downstream responses come back with status and
//! JSON body intact for the caller to propagate unchanged; failures without
//! a structured response surface as `OutboundError`. No retries, no timeout
//! override beyond the transport default.

use std::time::Instant;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::lifecycle::RequestContext;
use crate::trace::TRACE_CONTEXT_HEADER;

/// Structured reply from the downstream hop: any status, JSON body.
#[derive(Debug, Clone)]
pub struct DownstreamReply {
    pub status: u16,
    pub body: Value,
}

impl DownstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Error text carried in the downstream body, if any.
    pub fn error_text(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutboundError {
    #[error("request to {target} failed: {source}")]
    Transport {
        target: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{target} returned a non-JSON response: {detail}")]
    Payload { target: String, detail: String },
}

/// HTTP client for the single downstream hop of a service.
#[derive(Clone)]
pub struct DownstreamClient {
    client: Client,
    base_url: String,
    target: String,
}

impl DownstreamClient {
    pub fn new(target: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            target: target.to_owned(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// POST a JSON body downstream, propagating the current trace context.
    pub async fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        ctx: &RequestContext,
    ) -> Result<DownstreamReply, OutboundError> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        tracing::info!(
            correlation_id = %ctx.correlation_id,
            target = %self.target,
            url = %url,
            "calling downstream service"
        );

        let response = self
            .client
            .post(&url)
            .header(TRACE_CONTEXT_HEADER, ctx.trace.header_value())
            .json(body)
            .send()
            .await
            .map_err(|source| OutboundError::Transport {
                target: self.target.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| OutboundError::Transport {
                target: self.target.clone(),
                source,
            })?;
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|err| OutboundError::Payload {
                target: self.target.clone(),
                detail: err.to_string(),
            })?;

        let duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            correlation_id = %ctx.correlation_id,
            target = %self.target,
            status,
            duration_ms,
            "downstream call finished"
        );

        Ok(DownstreamReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = DownstreamClient::new("payment-service", "http://localhost:8082/");
        assert_eq!(client.base_url, "http://localhost:8082");
        assert_eq!(client.target(), "payment-service");
    }

    #[test]
    fn reply_success_covers_2xx_only() {
        let ok = DownstreamReply {
            status: 204,
            body: Value::Null,
        };
        let declined = DownstreamReply {
            status: 400,
            body: serde_json::json!({"status": "declined", "error": "Card declined"}),
        };
        assert!(ok.is_success());
        assert!(!declined.is_success());
        assert_eq!(declined.error_text(), Some("Card declined"));
    }
}
