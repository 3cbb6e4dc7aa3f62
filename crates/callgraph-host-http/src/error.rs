//! Failures of a single outbound peer call.

use std::time::Duration;

use thiserror::Error;

/// Status reported for a peer whose response body was not a result tree.
const STATUS_BAD_GATEWAY: u16 = 502;

/// Status reported for a peer call cut short by a timeout or deadline.
const STATUS_GATEWAY_TIMEOUT: u16 = 504;

/// Why a peer call did not produce a result tree.
///
/// None of these abort the caller: each one is recorded as a status-only
/// leaf in the caller's result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
  /// The peer name did not render to a valid URL.
  #[error("peer address '{target}' is not a valid url: {message}")]
  Unresolvable { target: String, message: String },

  /// Connection or I/O failure; no response status is available.
  #[error("transport failure calling {target}: {message}")]
  Transport { target: String, message: String },

  /// The peer answered with something other than 200.
  #[error("peer {target} responded with status {status}")]
  Status { target: String, status: u16 },

  /// The peer answered 200 but the body is not a result tree.
  #[error("malformed response from {target}: {message}")]
  MalformedResponse { target: String, message: String },

  /// The configured per-call timeout expired.
  #[error("call to {target} timed out after {after:?}")]
  Timeout { target: String, after: Duration },

  /// The request deadline had already passed when the call was due.
  #[error("deadline exceeded before calling {target}")]
  DeadlineExceeded { target: String },

  /// The task running the call did not complete.
  #[error("call to {target} was aborted: {message}")]
  Aborted { target: String, message: String },
}

impl CallError {
  /// Address the call was made to.
  pub fn target(&self) -> &str {
    match self {
      CallError::Unresolvable { target, .. }
      | CallError::Transport { target, .. }
      | CallError::Status { target, .. }
      | CallError::MalformedResponse { target, .. }
      | CallError::Timeout { target, .. }
      | CallError::DeadlineExceeded { target }
      | CallError::Aborted { target, .. } => target,
    }
  }

  /// Status recorded in the leaf that replaces this call's result.
  pub fn status(&self) -> Option<u16> {
    match self {
      CallError::Status { status, .. } => Some(*status),
      CallError::MalformedResponse { .. } => Some(STATUS_BAD_GATEWAY),
      CallError::Timeout { .. } | CallError::DeadlineExceeded { .. } => Some(STATUS_GATEWAY_TIMEOUT),
      CallError::Unresolvable { .. } | CallError::Transport { .. } | CallError::Aborted { .. } => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_mapping() {
    let target = || "http://a:5000/test".to_string();

    assert_eq!(CallError::Status { target: target(), status: 500 }.status(), Some(500));
    assert_eq!(
      CallError::MalformedResponse { target: target(), message: "eof".to_string() }.status(),
      Some(502)
    );
    assert_eq!(
      CallError::Timeout { target: target(), after: Duration::from_secs(1) }.status(),
      Some(504)
    );
    assert_eq!(CallError::DeadlineExceeded { target: target() }.status(), Some(504));
    assert_eq!(
      CallError::Transport { target: target(), message: "refused".to_string() }.status(),
      None
    );
  }

  #[test]
  fn test_target() {
    let err = CallError::Unresolvable {
      target: "http://:5000/test".to_string(),
      message: "empty host".to_string(),
    };
    assert_eq!(err.target(), "http://:5000/test");
  }
}
