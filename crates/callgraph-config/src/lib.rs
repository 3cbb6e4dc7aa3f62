//! Callgraph Config
//!
//! This crate contains the serializable types exchanged between callgraph
//! instances:
//!
//! - [`CallSpec`]: the request body of `POST /test`, a tree describing which
//!   peers to call, how often each node fails and how long it takes.
//! - [`ResultNode`]: the response body, a tree mirroring the request with the
//!   status observed for every node.
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "frontend",
//!   "latency": 20,
//!   "calls": [
//!     { "name": "cart", "errors": 10 },
//!     { "name": "catalog", "calls": [{ "name": "db", "latency": 5 }] }
//!   ]
//! }
//! ```

mod error;
mod result;
mod spec;

pub use error::SpecError;
pub use result::{ResultNode, STATUS_OK};
pub use spec::{CallSpec, MAX_ERROR_RATE};
