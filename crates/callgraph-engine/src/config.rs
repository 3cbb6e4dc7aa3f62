//! Executor configuration.

use callgraph_config::{CallSpec, SpecError};
use callgraph_resolver::UrlTemplate;

/// Bounds on the call trees an instance accepts.
///
/// Both are unbounded by default, which accepts any tree a caller sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
  /// Maximum number of levels, the receiving node included.
  pub max_depth: Option<usize>,
  /// Maximum number of direct calls of any node.
  pub max_fanout: Option<usize>,
}

impl Limits {
  /// Validate a received call tree against these limits.
  ///
  /// Every hop checks the subtree it received, so with depth or fan-out
  /// bounded a request costs O(nodes x depth) across the tree. Without
  /// bounds only the receiving node's error rate is checked.
  pub fn check(&self, spec: &CallSpec) -> Result<(), SpecError> {
    spec.validate(self.max_depth, self.max_fanout)
  }
}

/// Configuration for the call executor.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
  /// Template turning peer names into target URLs.
  pub url_template: UrlTemplate,
  /// Bounds checked before a node dispatches anything.
  pub limits: Limits,
  /// Seed for fault injection. `None` draws from the thread-local RNG.
  pub seed: Option<u64>,
}
