use thiserror::Error;

/// Reasons a call specification is refused before any call is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
  #[error("error rate {rate}% at node {node} is out of range (0-100)")]
  ErrorRateOutOfRange { node: String, rate: u32 },

  #[error("call tree depth {depth} exceeds the maximum of {max}")]
  DepthExceeded { depth: usize, max: usize },

  #[error("node {node} fans out to {fanout} peers, exceeding the maximum of {max}")]
  FanoutExceeded {
    node: String,
    fanout: usize,
    max: usize,
  },
}
