//! Per-request log correlation identifiers.
//!
//! Short identifiers grouping one request's log lines within a single
//! service instance. Local uniqueness is all that is required; the id is
//! never propagated downstream, each hop mints its own.

use uuid::Uuid;

const CORRELATION_ID_LEN: usize = 12;

/// Mint a correlation identifier: 12 hex characters taken from a UUIDv4.
pub fn correlation_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(CORRELATION_ID_LEN);
    id
}
