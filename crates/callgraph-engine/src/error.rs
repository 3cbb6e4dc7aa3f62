//! Error types for node execution.

use callgraph_config::SpecError;
use thiserror::Error;

/// Why a node produced no result tree.
///
/// Unlike a failed downstream call, which is absorbed into a leaf, a node
/// failure is reported to whoever invoked the node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeFailure {
  /// The node's fault check drew a failure.
  #[error("random injected failure at node {node} (rolled {roll} < {error_rate}%)")]
  Injected {
    node: String,
    roll: u32,
    error_rate: u32,
  },

  /// The call tree was refused before anything was dispatched.
  #[error("call spec rejected: {0}")]
  Rejected(#[from] SpecError),
}

impl NodeFailure {
  pub fn is_injected(&self) -> bool {
    matches!(self, NodeFailure::Injected { .. })
  }
}
