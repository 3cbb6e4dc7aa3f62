use serde::{Deserialize, Serialize};

/// Status reported for a node that finished its own work.
pub const STATUS_OK: u16 = 200;

/// A node of the tree returned by `POST /test`.
///
/// Successful nodes mirror their [`CallSpec`](crate::CallSpec) one-to-one.
/// A downstream call that failed is collapsed into a leaf named after the
/// address that was called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultNode {
  #[serde(default, alias = "Name")]
  pub name: Option<String>,

  /// Observed HTTP status; absent when no response was received at all.
  #[serde(default, alias = "StatusCode")]
  pub status_code: Option<u16>,

  #[serde(default, alias = "Calls")]
  pub calls: Vec<ResultNode>,
}

impl ResultNode {
  /// A node that passed its own fault check, with its children's results.
  pub fn completed(name: Option<String>, calls: Vec<ResultNode>) -> Self {
    Self {
      name,
      status_code: Some(STATUS_OK),
      calls,
    }
  }

  /// A status-only leaf standing in for a call that produced no tree.
  pub fn leaf(address: impl Into<String>, status_code: Option<u16>) -> Self {
    Self {
      name: Some(address.into()),
      status_code,
      calls: Vec::new(),
    }
  }

  pub fn is_success(&self) -> bool {
    self.status_code == Some(STATUS_OK)
  }

  /// Number of levels in the tree; a leaf has depth 1.
  pub fn depth(&self) -> usize {
    1 + self.calls.iter().map(ResultNode::depth).max().unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_serialize_camel_case() {
    let node = ResultNode::completed(
      Some("root".to_string()),
      vec![ResultNode::leaf("http://db:5000/test", None)],
    );

    let value = serde_json::to_value(&node).unwrap();
    assert_eq!(
      value,
      json!({
        "name": "root",
        "statusCode": 200,
        "calls": [
          { "name": "http://db:5000/test", "statusCode": null, "calls": [] }
        ]
      })
    );
  }

  #[test]
  fn test_deserialize_missing_fields() {
    let node: ResultNode = serde_json::from_value(json!({ "statusCode": 503 })).unwrap();

    assert_eq!(node.name, None);
    assert_eq!(node.status_code, Some(503));
    assert!(node.calls.is_empty());
    assert!(!node.is_success());
  }

  #[test]
  fn test_leaf_and_completed() {
    let leaf = ResultNode::leaf("http://x:5000/test", Some(500));
    assert!(!leaf.is_success());
    assert_eq!(leaf.depth(), 1);

    let node = ResultNode::completed(None, vec![leaf]);
    assert!(node.is_success());
    assert_eq!(node.depth(), 2);
  }
}
