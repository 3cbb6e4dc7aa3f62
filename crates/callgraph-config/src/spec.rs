use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Highest meaningful value for [`CallSpec::errors`]: a node that always fails.
pub const MAX_ERROR_RATE: u32 = 100;

/// A node of the call tree an instance is asked to execute.
///
/// The root describes the receiving instance itself; every entry in `calls`
/// is sent as-is to the peer named by its `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSpec {
  /// Name of the peer to call. Also reported back as this node's name.
  #[serde(default, alias = "Name")]
  pub name: Option<String>,

  /// Downstream calls, in the order their results are reported.
  #[serde(default, alias = "Calls")]
  pub calls: Vec<CallSpec>,

  /// Percentage (0-100) of executions of this node that fail on purpose.
  #[serde(default, alias = "Errors", skip_serializing_if = "Option::is_none")]
  pub errors: Option<u32>,

  /// Simulated processing time of this node, in milliseconds.
  #[serde(default, alias = "Latency", skip_serializing_if = "Option::is_none")]
  pub latency: Option<u64>,
}

impl CallSpec {
  /// Create a leaf spec calling the named peer.
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      ..Self::default()
    }
  }

  /// Append a downstream call.
  pub fn with_call(mut self, call: CallSpec) -> Self {
    self.calls.push(call);
    self
  }

  /// Set the failure percentage.
  pub fn with_errors(mut self, errors: u32) -> Self {
    self.errors = Some(errors);
    self
  }

  /// Set the simulated latency in milliseconds.
  pub fn with_latency(mut self, latency_ms: u64) -> Self {
    self.latency = Some(latency_ms);
    self
  }

  /// Failure percentage, `0` when unset.
  pub fn error_rate(&self) -> u32 {
    self.errors.unwrap_or(0)
  }

  /// Simulated latency in milliseconds, `0` when unset.
  pub fn latency_ms(&self) -> u64 {
    self.latency.unwrap_or(0)
  }

  /// Name used in logs and error messages.
  pub fn display_name(&self) -> &str {
    self.name.as_deref().unwrap_or("<unnamed>")
  }

  /// Number of levels in the tree; a spec without calls has depth 1.
  pub fn depth(&self) -> usize {
    1 + self.calls.iter().map(CallSpec::depth).max().unwrap_or(0)
  }

  /// Largest number of direct calls made by any node of the tree.
  pub fn max_fanout(&self) -> usize {
    self
      .calls
      .iter()
      .map(CallSpec::max_fanout)
      .max()
      .unwrap_or(0)
      .max(self.calls.len())
  }

  /// Total number of nodes in the tree, this one included.
  pub fn node_count(&self) -> usize {
    1 + self.calls.iter().map(CallSpec::node_count).sum::<usize>()
  }

  /// Check a received spec before anything is executed.
  ///
  /// The error rate is checked on this node only: a descendant with an
  /// out-of-range rate is rejected by the instance that receives it, and
  /// collapses into a leaf here like any other failed call. Depth and
  /// fan-out cover the whole subtree, and are only bounded when a maximum
  /// is given.
  pub fn validate(
    &self,
    max_depth: Option<usize>,
    max_fanout: Option<usize>,
  ) -> Result<(), SpecError> {
    let rate = self.error_rate();
    if rate > MAX_ERROR_RATE {
      return Err(SpecError::ErrorRateOutOfRange {
        node: self.display_name().to_string(),
        rate,
      });
    }

    if let Some(max) = max_depth {
      let depth = self.depth();
      if depth > max {
        return Err(SpecError::DepthExceeded { depth, max });
      }
    }

    match max_fanout {
      Some(max) => self.check_fanout(max),
      None => Ok(()),
    }
  }

  fn check_fanout(&self, max: usize) -> Result<(), SpecError> {
    if self.calls.len() > max {
      return Err(SpecError::FanoutExceeded {
        node: self.display_name().to_string(),
        fanout: self.calls.len(),
        max,
      });
    }

    self.calls.iter().try_for_each(|call| call.check_fanout(max))
  }
}
