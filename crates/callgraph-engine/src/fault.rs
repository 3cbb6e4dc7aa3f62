//! Injected failures and simulated latency.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::NodeFailure;

/// Rolls are drawn uniformly from `0..ROLL_RANGE`.
pub const ROLL_RANGE: u32 = 100;

/// Source of fault-injection rolls.
///
/// Shared by every node executing in the process, so implementations must
/// tolerate concurrent use.
pub trait RollSource: Send + Sync + Debug {
  /// Draw a uniform integer in `0..ROLL_RANGE`.
  fn roll(&self) -> u32;
}

/// Draws from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRoll;

impl RollSource for ThreadRoll {
  fn roll(&self) -> u32 {
    rand::rng().random_range(0..ROLL_RANGE)
  }
}

/// Draws from a seeded RNG, for reproducible runs.
#[derive(Debug)]
pub struct SeededRoll {
  rng: Mutex<StdRng>,
}

impl SeededRoll {
  pub fn new(seed: u64) -> Self {
    Self {
      rng: Mutex::new(StdRng::seed_from_u64(seed)),
    }
  }
}

impl RollSource for SeededRoll {
  fn roll(&self) -> u32 {
    let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
    rng.random_range(0..ROLL_RANGE)
  }
}

/// Decides whether a node fails itself, and holds it for its latency.
#[derive(Debug, Clone)]
pub struct FaultSimulator {
  source: Arc<dyn RollSource>,
}

impl FaultSimulator {
  pub fn new(source: impl RollSource + 'static) -> Self {
    Self {
      source: Arc::new(source),
    }
  }

  /// Seeded simulator when a seed is given, thread-local RNG otherwise.
  pub fn from_seed(seed: Option<u64>) -> Self {
    match seed {
      Some(seed) => Self::new(SeededRoll::new(seed)),
      None => Self::new(ThreadRoll),
    }
  }

  /// Draw once; the node fails when the roll is below `error_rate`.
  pub fn check(&self, node: &str, error_rate: u32) -> Result<(), NodeFailure> {
    let roll = self.source.roll();
    if roll < error_rate {
      return Err(NodeFailure::Injected {
        node: node.to_string(),
        roll,
        error_rate,
      });
    }
    Ok(())
  }

  /// Suspend the calling task for the simulated processing time.
  ///
  /// The worker thread stays free for other requests meanwhile.
  pub async fn delay(&self, latency_ms: u64) {
    if latency_ms > 0 {
      tokio::time::sleep(Duration::from_millis(latency_ms)).await;
    }
  }
}

impl Default for FaultSimulator {
  fn default() -> Self {
    Self::new(ThreadRoll)
  }
}
