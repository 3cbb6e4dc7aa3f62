//! Call tree execution for callgraph.
//!
//! This crate provides the [`CallExecutor`] which runs one node of a call
//! tree:
//! - concurrent fan-out of the node's calls to its peers ([`FanoutDispatcher`])
//! - a full barrier until every call has finished, successfully or not
//! - the node's own injected failure and latency ([`FaultSimulator`])
//! - assembly of the result tree ([`aggregate`])
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CallExecutor                          │
//! │  - execute(spec, ctx) → NodeOutcome                         │
//! │  - limit checks, notifier events                            │
//! └─────────────────────────────────────────────────────────────┘
//!          │                    │                     │
//!          ▼                    ▼                     ▼
//! ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────┐
//! │ FanoutDispatcher │ │  FaultSimulator  │ │    aggregate     │
//! │ resolve + spawn  │ │ roll + sleep     │ │ children → tree  │
//! │ one call / child │ │                  │ │                  │
//! └──────────────────┘ └──────────────────┘ └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 PeerClient (callgraph-host-http)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod aggregate;
mod config;
mod dispatch;
mod error;
mod events;
mod executor;
mod fault;
mod outcome;

pub use aggregate::aggregate;
pub use config::{ExecutorConfig, Limits};
pub use dispatch::FanoutDispatcher;
pub use error::NodeFailure;
pub use events::{ChannelNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier, TracingNotifier};
pub use executor::CallExecutor;
pub use fault::{FaultSimulator, ROLL_RANGE, RollSource, SeededRoll, ThreadRoll};
pub use outcome::{ChildOutcome, NodeOutcome};
