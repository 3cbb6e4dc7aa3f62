//! Call executor implementation.

use std::sync::Arc;

use callgraph_config::CallSpec;
use callgraph_host_http::{CallContext, PeerClient};
use callgraph_resolver::TemplateResolver;
use tokio::time::Instant;
use tracing::instrument;

use crate::aggregate::aggregate;
use crate::config::{ExecutorConfig, Limits};
use crate::dispatch::FanoutDispatcher;
use crate::error::NodeFailure;
use crate::events::{ExecutionEvent, ExecutionNotifier, NoopNotifier};
use crate::fault::FaultSimulator;
use crate::outcome::{ChildOutcome, NodeOutcome};

/// Executes one node of a call tree.
///
/// Generic over `C: PeerClient` so the transport can be swapped out, and
/// over `N: ExecutionNotifier` to allow different observation strategies.
/// Use `CallExecutor::new()` for no-op notifications, or
/// `CallExecutor::with_notifier()` to provide a custom notifier.
pub struct CallExecutor<C: PeerClient, N: ExecutionNotifier = NoopNotifier> {
  dispatcher: FanoutDispatcher<C>,
  faults: FaultSimulator,
  limits: Limits,
  notifier: N,
}

impl<C: PeerClient> CallExecutor<C, NoopNotifier> {
  /// Create a new executor with no-op notifications.
  pub fn new(config: ExecutorConfig, client: C) -> Self {
    Self::with_notifier(config, client, NoopNotifier)
  }
}

impl<C: PeerClient, N: ExecutionNotifier> CallExecutor<C, N> {
  /// Create a new executor with a custom notifier.
  pub fn with_notifier(config: ExecutorConfig, client: C, notifier: N) -> Self {
    let resolver = Arc::new(TemplateResolver::new(config.url_template));

    Self {
      dispatcher: FanoutDispatcher::new(resolver, Arc::new(client)),
      faults: FaultSimulator::from_seed(config.seed),
      limits: config.limits,
      notifier,
    }
  }

  /// Replace the fault simulator, e.g. with a fixed roll source.
  pub fn with_faults(mut self, faults: FaultSimulator) -> Self {
    self.faults = faults;
    self
  }

  /// Execute a node: call every child, wait for all of them, apply the
  /// node's own fault check and latency, then assemble its result.
  ///
  /// Failed calls never fail the node; they become leaves of its result.
  /// Only the node's own fault check, or a call tree outside the configured
  /// limits, yields [`NodeOutcome::Failure`].
  #[instrument(
    name = "node_execute",
    skip(self, spec, ctx),
    fields(
      node = %spec.display_name(),
      calls = spec.calls.len(),
      error_rate = spec.error_rate(),
      latency_ms = spec.latency_ms(),
    )
  )]
  pub async fn execute(&self, spec: &CallSpec, ctx: &CallContext) -> NodeOutcome {
    let started = Instant::now();

    if let Err(e) = self.limits.check(spec) {
      return self.fail(spec, NodeFailure::Rejected(e));
    }

    self.notifier.notify(ExecutionEvent::NodeStarted {
      node: spec.name.clone(),
      calls: spec.calls.len(),
      error_rate: spec.error_rate(),
      latency_ms: spec.latency_ms(),
    });

    let outcomes = self.dispatcher.dispatch(spec, ctx, &self.notifier).await;
    let failed_calls = self.report_failed_calls(spec, &outcomes);

    if let Err(failure) = self.faults.check(spec.display_name(), spec.error_rate()) {
      return self.fail(spec, failure);
    }

    self.faults.delay(spec.latency_ms()).await;

    let result = aggregate(spec.name.clone(), outcomes);

    self.notifier.notify(ExecutionEvent::NodeCompleted {
      node: spec.name.clone(),
      calls: result.calls.len(),
      failed_calls,
      elapsed_ms: started.elapsed().as_millis() as u64,
    });

    NodeOutcome::Success(result)
  }

  fn report_failed_calls(&self, spec: &CallSpec, outcomes: &[ChildOutcome]) -> usize {
    let mut failed = 0;
    for (index, outcome) in outcomes.iter().enumerate() {
      if let ChildOutcome::Failed(e) = outcome {
        failed += 1;
        self.notifier.notify(ExecutionEvent::CallFailed {
          node: spec.name.clone(),
          index,
          target: e.target().to_string(),
          status: e.status(),
          error: e.to_string(),
        });
      }
    }
    failed
  }

  fn fail(&self, spec: &CallSpec, failure: NodeFailure) -> NodeOutcome {
    self.notifier.notify(ExecutionEvent::NodeFailed {
      node: spec.name.clone(),
      injected: failure.is_injected(),
      error: failure.to_string(),
    });
    NodeOutcome::Failure(failure)
  }
}
