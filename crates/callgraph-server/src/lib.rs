//! HTTP surface of a callgraph instance.
//!
//! - `POST /test` executes a call spec and answers with its result tree
//! - `GET /health` answers `OK` while the process is alive
//! - `GET /version` reports build metadata

mod app_info;
mod handlers;
mod router;
mod state;

pub use app_info::AppInfo;
pub use router::{router, serve};
pub use state::{AppState, Executor};
