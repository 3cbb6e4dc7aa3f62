use std::sync::Arc;
use std::time::Duration;

use callgraph_engine::{CallExecutor, TracingNotifier};
use callgraph_host_http::HttpPeerClient;

use crate::app_info::AppInfo;

/// The executor serving `POST /test`.
pub type Executor = CallExecutor<HttpPeerClient, TracingNotifier>;

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
  executor: Arc<Executor>,
  app_info: AppInfo,
  request_timeout: Option<Duration>,
}

impl AppState {
  pub fn new(executor: Executor, app_info: AppInfo) -> Self {
    Self {
      executor: Arc::new(executor),
      app_info,
      request_timeout: None,
    }
  }

  /// Bound every request's downstream calls to `timeout` from arrival,
  /// unless the caller propagated a tighter deadline.
  pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
    self.request_timeout = timeout;
    self
  }

  pub fn executor(&self) -> &Executor {
    &self.executor
  }

  pub fn app_info(&self) -> &AppInfo {
    &self.app_info
  }

  pub fn request_timeout(&self) -> Option<Duration> {
    self.request_timeout
  }
}
