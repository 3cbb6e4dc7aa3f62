use std::fmt;

const UNKNOWN: &str = "unknown";

/// Name, version and build details of the running binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
  pub name: &'static str,
  pub version: &'static str,
  pub revision: &'static str,
  pub build_time: &'static str,
}

impl AppInfo {
  /// Revision and build time come from `CALLGRAPH_REVISION` and
  /// `CALLGRAPH_BUILD_TIME` at compile time.
  pub fn new(name: &'static str, version: &'static str) -> Self {
    Self {
      name,
      version,
      revision: option_env!("CALLGRAPH_REVISION").unwrap_or(UNKNOWN),
      build_time: option_env!("CALLGRAPH_BUILD_TIME").unwrap_or(UNKNOWN),
    }
  }

  /// One field per line, for `--version`.
  pub fn lines(&self) -> String {
    format!(
      "{}\n{}\n{}\n{}",
      self.name, self.version, self.revision, self.build_time
    )
  }
}

impl fmt::Display for AppInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "App Name: {}, Version: {}, Revision: {}, BuildTime: {}",
      self.name, self.version, self.revision, self.build_time
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn info() -> AppInfo {
    AppInfo {
      name: "callgraph",
      version: "1.2.3",
      revision: "abc123",
      build_time: "2026-01-01T00:00:00Z",
    }
  }

  #[test]
  fn test_display() {
    assert_eq!(
      info().to_string(),
      "App Name: callgraph, Version: 1.2.3, Revision: abc123, BuildTime: 2026-01-01T00:00:00Z"
    );
  }

  #[test]
  fn test_lines() {
    assert_eq!(info().lines(), "callgraph\n1.2.3\nabc123\n2026-01-01T00:00:00Z");
  }
}
