//! Concurrent fan-out of a node's calls.

use std::sync::Arc;

use callgraph_config::CallSpec;
use callgraph_host_http::{CallContext, CallError, PeerClient};
use callgraph_resolver::Resolver;
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::events::{ExecutionEvent, ExecutionNotifier};
use crate::outcome::ChildOutcome;

/// A call that is either running or already known to have failed.
enum PendingCall {
  Running {
    target: String,
    handle: JoinHandle<ChildOutcome>,
  },
  Done(ChildOutcome),
}

/// Issues one outbound call per child of a node and waits for all of them.
pub struct FanoutDispatcher<C: PeerClient> {
  resolver: Arc<dyn Resolver>,
  client: Arc<C>,
}

impl<C: PeerClient> FanoutDispatcher<C> {
  pub fn new(resolver: Arc<dyn Resolver>, client: Arc<C>) -> Self {
    Self { resolver, client }
  }

  /// Call every child of `spec` concurrently.
  ///
  /// Calls are started in spec order and all of them run to completion; the
  /// returned outcomes are index-aligned with `spec.calls` whatever order
  /// the calls finish in.
  pub async fn dispatch<N: ExecutionNotifier>(
    &self,
    spec: &CallSpec,
    ctx: &CallContext,
    notifier: &N,
  ) -> Vec<ChildOutcome> {
    let pending: Vec<PendingCall> = spec
      .calls
      .iter()
      .enumerate()
      .map(|(index, call)| self.start_call(spec, index, call, ctx, notifier))
      .collect();

    join_all(pending.into_iter().map(|call| async move {
      match call {
        PendingCall::Done(outcome) => outcome,
        PendingCall::Running { target, handle } => match handle.await {
          Ok(outcome) => outcome,
          Err(e) => ChildOutcome::Failed(CallError::Aborted {
            target,
            message: e.to_string(),
          }),
        },
      }
    }))
    .await
  }

  fn start_call<N: ExecutionNotifier>(
    &self,
    parent: &CallSpec,
    index: usize,
    call: &CallSpec,
    ctx: &CallContext,
    notifier: &N,
  ) -> PendingCall {
    let target = match self.resolver.resolve(call.name.as_deref()) {
      Ok(target) => target,
      Err(e) => {
        return PendingCall::Done(ChildOutcome::Failed(CallError::Unresolvable {
          target: e.address,
          message: e.source.to_string(),
        }));
      }
    };

    notifier.notify(ExecutionEvent::CallDispatched {
      node: parent.name.clone(),
      index,
      target: target.to_string(),
    });

    let client = self.client.clone();
    let call = call.clone();
    let ctx = ctx.clone();
    let address = target.to_string();

    let handle = tokio::spawn(
      async move { ChildOutcome::from(client.call(&target, &call, &ctx).await) }
        .instrument(tracing::Span::current()),
    );

    PendingCall::Running {
      target: address,
      handle,
    }
  }
}
