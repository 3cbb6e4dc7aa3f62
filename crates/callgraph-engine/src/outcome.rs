//! Outcomes of node execution and of the calls a node makes.

use callgraph_config::ResultNode;
use callgraph_host_http::CallError;

use crate::error::NodeFailure;

/// Result of executing one node.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
  /// The node passed its fault check; carries its result tree.
  Success(ResultNode),
  /// The node failed itself and produced no tree.
  Failure(NodeFailure),
}

impl NodeOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, NodeOutcome::Success(_))
  }

  pub fn into_result(self) -> Result<ResultNode, NodeFailure> {
    match self {
      NodeOutcome::Success(node) => Ok(node),
      NodeOutcome::Failure(failure) => Err(failure),
    }
  }
}

/// Terminal state of one downstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildOutcome {
  /// The peer answered with its result tree.
  Completed(ResultNode),
  /// The call failed; only the address and an observed status remain.
  Failed(CallError),
}

impl From<Result<ResultNode, CallError>> for ChildOutcome {
  fn from(result: Result<ResultNode, CallError>) -> Self {
    match result {
      Ok(node) => ChildOutcome::Completed(node),
      Err(e) => ChildOutcome::Failed(e),
    }
  }
}
