//! Execution events and notifiers for observability.
//!
//! Events are emitted at fixed points of node execution so that tracing,
//! metrics or test probes can attach without changing what a node does.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Events emitted while a node executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionEvent {
  /// The node passed its limit checks and is about to dispatch its calls.
  NodeStarted {
    node: Option<String>,
    calls: usize,
    error_rate: u32,
    latency_ms: u64,
  },

  /// A downstream call has been issued.
  CallDispatched {
    node: Option<String>,
    index: usize,
    target: String,
  },

  /// A downstream call failed and was collapsed into a leaf.
  CallFailed {
    node: Option<String>,
    index: usize,
    target: String,
    status: Option<u16>,
    error: String,
  },

  /// The node failed itself and returns no tree.
  NodeFailed {
    node: Option<String>,
    injected: bool,
    error: String,
  },

  /// The node's result tree has been assembled.
  NodeCompleted {
    node: Option<String>,
    calls: usize,
    failed_calls: usize,
    elapsed_ms: u64,
  },
}

/// Trait for receiving execution events.
///
/// The executor calls `notify` for each event; implementations decide what
/// to do with them (log, count, forward, ignore).
pub trait ExecutionNotifier: Send + Sync + 'static {
  /// Called when an execution event occurs.
  fn notify(&self, event: ExecutionEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ExecutionNotifier for NoopNotifier {
  fn notify(&self, _event: ExecutionEvent) {}
}

/// A notifier that writes every event as a structured log line.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl ExecutionNotifier for TracingNotifier {
  fn notify(&self, event: ExecutionEvent) {
    match event {
      ExecutionEvent::NodeStarted {
        node,
        calls,
        error_rate,
        latency_ms,
      } => info!(
        node = node.as_deref().unwrap_or_default(),
        calls, error_rate, latency_ms, "node_started"
      ),
      ExecutionEvent::CallDispatched {
        node,
        index,
        target,
      } => debug!(
        node = node.as_deref().unwrap_or_default(),
        index,
        target_url = %target,
        "call_dispatched"
      ),
      ExecutionEvent::CallFailed {
        node,
        index,
        target,
        status,
        error,
      } => warn!(
        node = node.as_deref().unwrap_or_default(),
        index,
        target_url = %target,
        ?status,
        error = %error,
        "call_failed"
      ),
      ExecutionEvent::NodeFailed {
        node,
        injected,
        error,
      } => warn!(
        node = node.as_deref().unwrap_or_default(),
        injected,
        error = %error,
        "node_failed"
      ),
      ExecutionEvent::NodeCompleted {
        node,
        calls,
        failed_calls,
        elapsed_ms,
      } => info!(
        node = node.as_deref().unwrap_or_default(),
        calls, failed_calls, elapsed_ms, "node_completed"
      ),
    }
  }
}

/// A notifier that sends events to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  // Unbounded so a slow consumer never holds up a node; a node emits a
  // handful of events per call it makes.
  sender: mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelNotifier {
  /// Create a new channel notifier.
  pub fn new(sender: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
    Self { sender }
  }
}

impl ExecutionNotifier for ChannelNotifier {
  fn notify(&self, event: ExecutionEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_event_json_shape() {
    let event = ExecutionEvent::CallFailed {
      node: Some("root".to_string()),
      index: 1,
      target: "http://b:5000/test".to_string(),
      status: None,
      error: "connection refused".to_string(),
    };

    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(
      value,
      json!({
        "CallFailed": {
          "node": "root",
          "index": 1,
          "target": "http://b:5000/test",
          "status": null,
          "error": "connection refused"
        }
      })
    );
    assert_eq!(serde_json::from_value::<ExecutionEvent>(value).unwrap(), event);
  }

  #[test]
  fn test_channel_notifier_survives_dropped_receiver() {
    let (tx, rx) = mpsc::unbounded_channel();
    let notifier = ChannelNotifier::new(tx);
    drop(rx);

    notifier.notify(ExecutionEvent::NodeFailed {
      node: None,
      injected: true,
      error: "random injected failure".to_string(),
    });
  }
}
