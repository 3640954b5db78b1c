//! Causal trace context carried across service hops.
//!
//! The wire format is a single colon-delimited header value:
//! `{trace_id:032x}:{span_id:016x}:{flags}`, where flags is `1` when the
//! trace is sampled. The receiving hop derives its own span as a child of
//! the propagated span, so the spans of one external request share one
//! trace identifier across every service in the chain.

use rand::Rng;

/// Header carrying the trace context between services.
pub const TRACE_CONTEXT_HEADER: &str = "x-trace-context";

/// Identity of one hop's span within a distributed trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: u128,
    pub span_id: u64,
    pub parent_span_id: Option<u64>,
    pub sampled: bool,
}

impl TraceContext {
    /// Start a new trace at the root of a call chain.
    pub fn new_root() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            trace_id: nonzero_u128(&mut rng),
            span_id: nonzero_u64(&mut rng),
            parent_span_id: None,
            sampled: true,
        }
    }

    /// Derive the next span in the same trace: fresh span id, parented here.
    pub fn child(&self) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            trace_id: self.trace_id,
            span_id: nonzero_u64(&mut rng),
            parent_span_id: Some(self.span_id),
            sampled: self.sampled,
        }
    }

    /// Parse a propagated header value. Returns `None` on malformed input;
    /// callers start a new root trace in that case.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim().split(':');
        let trace_id = u128::from_str_radix(parts.next()?, 16).ok()?;
        let span_id = u64::from_str_radix(parts.next()?, 16).ok()?;
        let flags = parts.next()?;
        if parts.next().is_some() || trace_id == 0 || span_id == 0 {
            return None;
        }
        let sampled = match flags {
            "1" => true,
            "0" => false,
            _ => return None,
        };
        Some(Self {
            trace_id,
            span_id,
            parent_span_id: None,
            sampled,
        })
    }

    /// Render the header value announcing this span to the next hop.
    pub fn header_value(&self) -> String {
        format!(
            "{:032x}:{:016x}:{}",
            self.trace_id,
            self.span_id,
            u8::from(self.sampled)
        )
    }

    pub fn trace_id_hex(&self) -> String {
        format!("{:032x}", self.trace_id)
    }

    pub fn span_id_hex(&self) -> String {
        format!("{:016x}", self.span_id)
    }

    pub fn parent_span_id_hex(&self) -> Option<String> {
        self.parent_span_id.map(|id| format!("{:016x}", id))
    }
}

fn nonzero_u128(rng: &mut impl Rng) -> u128 {
    loop {
        let v: u128 = rng.gen();
        if v != 0 {
            return v;
        }
    }
}

fn nonzero_u64(rng: &mut impl Rng) -> u64 {
    loop {
        let v: u64 = rng.gen();
        if v != 0 {
            return v;
        }
    }
}
