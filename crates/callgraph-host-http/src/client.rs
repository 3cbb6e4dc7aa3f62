use std::time::Duration;

use async_trait::async_trait;
use callgraph_config::{CallSpec, ResultNode};
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::context::{BAGGAGE_HEADER, CallContext, DEADLINE_HEADER};
use crate::error::CallError;

/// Sends a call spec to a peer and returns the tree it answers with.
///
/// Implementations must not retry: every failure is reported once, as a
/// [`CallError`], and becomes a leaf in the caller's result.
#[async_trait]
pub trait PeerClient: Send + Sync + 'static {
  async fn call(
    &self,
    target: &Url,
    spec: &CallSpec,
    ctx: &CallContext,
  ) -> Result<ResultNode, CallError>;
}

/// Configuration for [`HttpPeerClient`].
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
  /// Upper bound for a single peer call. `None` waits indefinitely.
  pub call_timeout: Option<Duration>,
}

/// [`PeerClient`] posting JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
  client: Client,
  config: HttpClientConfig,
}

impl HttpPeerClient {
  pub fn new(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
    let client = Client::builder().build()?;
    Ok(Self { client, config })
  }

  /// Timeout for a call made now: the tighter of the configured timeout and
  /// the time left before the request deadline.
  fn effective_timeout(&self, ctx: &CallContext) -> Option<Duration> {
    match (self.config.call_timeout, ctx.remaining()) {
      (Some(timeout), Some(remaining)) => Some(timeout.min(remaining)),
      (timeout, remaining) => timeout.or(remaining),
    }
  }

  fn map_send_error(target: &Url, timeout: Option<Duration>, e: reqwest::Error) -> CallError {
    match timeout {
      Some(after) if e.is_timeout() => CallError::Timeout {
        target: target.to_string(),
        after,
      },
      _ => CallError::Transport {
        target: target.to_string(),
        message: e.to_string(),
      },
    }
  }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
  async fn call(
    &self,
    target: &Url,
    spec: &CallSpec,
    ctx: &CallContext,
  ) -> Result<ResultNode, CallError> {
    if ctx.remaining() == Some(Duration::ZERO) {
      return Err(CallError::DeadlineExceeded {
        target: target.to_string(),
      });
    }

    let timeout = self.effective_timeout(ctx);
    let mut request = self.client.post(target.clone()).json(spec);

    if let Some(baggage) = &ctx.baggage {
      request = request.header(BAGGAGE_HEADER, baggage);
    }
    if let Some(remaining) = ctx.remaining() {
      request = request.header(DEADLINE_HEADER, remaining.as_millis().to_string());
    }
    if let Some(timeout) = timeout {
      request = request.timeout(timeout);
    }

    debug!(target_url = %target, peer = %spec.display_name(), ?timeout, "calling peer");

    let response = request
      .send()
      .await
      .map_err(|e| Self::map_send_error(target, timeout, e))?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(CallError::Status {
        target: target.to_string(),
        status: status.as_u16(),
      });
    }

    let body = response
      .bytes()
      .await
      .map_err(|e| Self::map_send_error(target, timeout, e))?;

    serde_json::from_slice(&body).map_err(|e| CallError::MalformedResponse {
      target: target.to_string(),
      message: e.to_string(),
    })
  }
}
