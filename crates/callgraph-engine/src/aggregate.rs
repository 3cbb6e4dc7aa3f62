//! Assembly of a node's result tree from its children's outcomes.

use callgraph_config::ResultNode;

use crate::outcome::ChildOutcome;

/// Build the result of a node that passed its own fault check.
///
/// Children keep their original order. A completed child contributes the
/// tree its peer returned, untouched; a failed child contributes a leaf
/// named after the address that was called.
pub fn aggregate(name: Option<String>, outcomes: Vec<ChildOutcome>) -> ResultNode {
  let calls = outcomes
    .into_iter()
    .map(|outcome| match outcome {
      ChildOutcome::Completed(node) => node,
      ChildOutcome::Failed(e) => ResultNode::leaf(e.target(), e.status()),
    })
    .collect();

  ResultNode::completed(name, calls)
}
