use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use callgraph_config::CallSpec;
use callgraph_engine::{NodeFailure, NodeOutcome};
use callgraph_host_http::{BAGGAGE_HEADER, CallContext, DEADLINE_HEADER};
use metrics::counter;
use tracing::{Instrument, info, info_span};

use crate::state::AppState;

const SUB_CALLS_TOTAL: &str = "callgraph_sub_calls_total";
const INJECTED_FAILURES_TOTAL: &str = "callgraph_injected_failures_total";

pub async fn handle_health() -> &'static str {
  "OK"
}

pub async fn handle_version(State(state): State<AppState>) -> String {
  state.app_info().to_string()
}

pub async fn handle_test(
  State(state): State<AppState>,
  headers: HeaderMap,
  Json(spec): Json<CallSpec>,
) -> Response {
  let span = info_span!(
    "api_test",
    request_id = %uuid::Uuid::new_v4(),
    node = %spec.display_name(),
    sub_calls = spec.calls.len(),
    errors = ?spec.errors,
    latency = ?spec.latency,
  );

  async move {
    let ctx = call_context(&headers, &state);

    counter!(SUB_CALLS_TOTAL).increment(spec.calls.len() as u64);
    info!(
      "Test called with {} subCalls, {}% errors, and {}ms latency",
      spec.calls.len(),
      spec.error_rate(),
      spec.latency_ms()
    );

    match state.executor().execute(&spec, &ctx).await {
      NodeOutcome::Success(result) => (StatusCode::OK, Json(result)).into_response(),
      NodeOutcome::Failure(failure @ NodeFailure::Injected { .. }) => {
        counter!(INJECTED_FAILURES_TOTAL).increment(1);
        (StatusCode::INTERNAL_SERVER_ERROR, failure.to_string()).into_response()
      }
      NodeOutcome::Failure(failure @ NodeFailure::Rejected(_)) => {
        (StatusCode::UNPROCESSABLE_ENTITY, failure.to_string()).into_response()
      }
    }
  }
  .instrument(span)
  .await
}

/// Build the context propagated to this request's downstream calls.
///
/// Incoming baggage is forwarded as-is; without it, the caller's
/// `User-Agent` becomes the baggage. A deadline propagated by the caller is
/// kept, tightened by the configured request timeout.
fn call_context(headers: &HeaderMap, state: &AppState) -> CallContext {
  let header_str = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

  let mut ctx = CallContext::new();

  if let Some(baggage) = header_str(BAGGAGE_HEADER) {
    info!(baggage, "Found baggage");
    ctx = ctx.with_baggage(baggage);
  } else if let Some(user_agent) = header_str(header::USER_AGENT.as_str()) {
    ctx = ctx.with_baggage(format!("User-Agent={}", user_agent));
  }

  if let Some(budget) = header_str(DEADLINE_HEADER).and_then(CallContext::parse_budget) {
    ctx = ctx.with_budget(budget);
  }

  ctx.tighten(state.request_timeout())
}
