//! Outbound calls from one callgraph instance to its peers.
//!
//! [`PeerClient`] is the seam the fan-out engine dispatches through;
//! [`HttpPeerClient`] is the production implementation on top of `reqwest`.
//! Every call carries a [`CallContext`] with the request-scoped baggage and
//! optional deadline that are forwarded to the peer as headers.

mod client;
mod context;
mod error;

pub use client::{HttpClientConfig, HttpPeerClient, PeerClient};
pub use context::{BAGGAGE_HEADER, CallContext, DEADLINE_HEADER};
pub use error::CallError;
