use std::time::Duration;

use tokio::time::Instant;

/// W3C baggage header, forwarded verbatim to every peer.
pub const BAGGAGE_HEADER: &str = "baggage";

/// Remaining time budget of the caller, in whole milliseconds.
pub const DEADLINE_HEADER: &str = "x-callgraph-deadline-ms";

/// Request-scoped data propagated down the call tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
  /// Baggage to attach to outbound calls.
  pub baggage: Option<String>,
  /// Instant by which every outbound call of this request must finish.
  pub deadline: Option<Instant>,
}

impl CallContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_baggage(mut self, baggage: impl Into<String>) -> Self {
    self.baggage = Some(baggage.into());
    self
  }

  /// Set the deadline to `budget` from now.
  pub fn with_budget(mut self, budget: Duration) -> Self {
    self.deadline = Some(Instant::now() + budget);
    self
  }

  /// Keep the earlier of the current deadline and `budget` from now.
  pub fn tighten(mut self, budget: Option<Duration>) -> Self {
    if let Some(budget) = budget {
      let candidate = Instant::now() + budget;
      self.deadline = Some(match self.deadline {
        Some(existing) => existing.min(candidate),
        None => candidate,
      });
    }
    self
  }

  /// Time left before the deadline, `None` when there is no deadline.
  pub fn remaining(&self) -> Option<Duration> {
    self
      .deadline
      .map(|deadline| deadline.saturating_duration_since(Instant::now()))
  }

  /// Parse the value of [`DEADLINE_HEADER`].
  pub fn parse_budget(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_millis)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_no_deadline_by_default() {
    let ctx = CallContext::new();
    assert_eq!(ctx.remaining(), None);
    assert_eq!(ctx.baggage, None);
  }

  #[tokio::test]
  async fn test_tighten_keeps_earliest_deadline() {
    let ctx = CallContext::new().with_budget(Duration::from_millis(100));
    let looser = ctx.clone().tighten(Some(Duration::from_secs(10)));
    assert_eq!(looser.deadline, ctx.deadline);

    let tighter = ctx.clone().tighten(Some(Duration::from_millis(1)));
    assert!(tighter.deadline < ctx.deadline);

    let unchanged = ctx.clone().tighten(None);
    assert_eq!(unchanged.deadline, ctx.deadline);
  }

  #[tokio::test]
  async fn test_remaining_saturates_at_zero() {
    let ctx = CallContext::new().with_budget(Duration::ZERO);
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(ctx.remaining(), Some(Duration::ZERO));
  }

  #[test]
  fn test_parse_budget() {
    assert_eq!(CallContext::parse_budget("250"), Some(Duration::from_millis(250)));
    assert_eq!(CallContext::parse_budget(" 7 "), Some(Duration::from_millis(7)));
    assert_eq!(CallContext::parse_budget("soon"), None);
    assert_eq!(CallContext::parse_budget("-5"), None);
  }
}
