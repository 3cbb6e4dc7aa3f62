use std::io::{self, Read};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use callgraph_config::CallSpec;
use callgraph_engine::{CallExecutor, ExecutorConfig, Limits, NodeOutcome, TracingNotifier};
use callgraph_host_http::{CallContext, HttpClientConfig, HttpPeerClient};
use callgraph_resolver::{DEFAULT_URL_TEMPLATE, UrlTemplate};
use callgraph_server::{AppInfo, AppState, Executor};

/// Callgraph - a distributed call-graph generator for testing tracing pipelines
#[derive(Parser)]
#[command(name = "callgraph")]
#[command(about, long_about = None, disable_version_flag = true)]
struct Cli {
  /// Print name, version, revision and build time, then exit
  #[arg(long)]
  version: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Serve /test, /health and /version
  Serve {
    /// Address to listen on
    #[arg(long, env = "CALLGRAPH_LISTEN", default_value = "0.0.0.0:5000")]
    listen: SocketAddr,

    #[command(flatten)]
    engine: EngineArgs,
  },

  /// Execute a single call spec and print its result tree
  Run {
    /// Path to the call spec (JSON); read from stdin when omitted
    spec_file: Option<PathBuf>,

    #[command(flatten)]
    engine: EngineArgs,
  },
}

#[derive(Args)]
struct EngineArgs {
  /// Peer address template; {name} is replaced with the peer name
  #[arg(long, env = "TEST_URL_TEMPLATE", default_value = DEFAULT_URL_TEMPLATE)]
  url_template: UrlTemplate,

  /// Reject call trees deeper than this
  #[arg(long, env = "CALLGRAPH_MAX_DEPTH")]
  max_depth: Option<usize>,

  /// Reject call trees where a node calls more peers than this
  #[arg(long, env = "CALLGRAPH_MAX_FANOUT")]
  max_fanout: Option<usize>,

  /// Give up on a single peer call after this many milliseconds
  #[arg(long, env = "CALLGRAPH_CALL_TIMEOUT_MS")]
  call_timeout_ms: Option<u64>,

  /// Deadline for all downstream calls of a request, in milliseconds
  #[arg(long, env = "CALLGRAPH_REQUEST_TIMEOUT_MS")]
  request_timeout_ms: Option<u64>,

  /// Seed for fault injection, for reproducible runs
  #[arg(long, env = "CALLGRAPH_SEED")]
  seed: Option<u64>,
}

impl EngineArgs {
  fn request_timeout(&self) -> Option<Duration> {
    self.request_timeout_ms.map(Duration::from_millis)
  }

  fn build_executor(&self) -> Result<Executor> {
    let client = HttpPeerClient::new(HttpClientConfig {
      call_timeout: self.call_timeout_ms.map(Duration::from_millis),
    })
    .context("failed to build http client")?;

    let config = ExecutorConfig {
      url_template: self.url_template.clone(),
      limits: Limits {
        max_depth: self.max_depth,
        max_fanout: self.max_fanout,
      },
      seed: self.seed,
    };

    Ok(CallExecutor::with_notifier(config, client, TracingNotifier))
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  let app_info = AppInfo::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

  if cli.version {
    println!("{}", app_info.lines());
    return Ok(());
  }

  init_logging();

  match cli.command {
    Some(Commands::Serve { listen, engine }) => serve(listen, engine, app_info),
    Some(Commands::Run { spec_file, engine }) => run(spec_file, engine),
    None => {
      println!("callgraph - use --help to see available commands");
      Ok(())
    }
  }
}

fn init_logging() {
  tracing_subscriber::fmt()
    .compact()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .with_target(true)
    .init();
}

fn serve(listen: SocketAddr, engine: EngineArgs, app_info: AppInfo) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { serve_async(listen, engine, app_info).await })
}

async fn serve_async(listen: SocketAddr, engine: EngineArgs, app_info: AppInfo) -> Result<()> {
  info!(
    app = %app_info,
    url_template = %engine.url_template,
    "callgraph starting"
  );

  let state = AppState::new(engine.build_executor()?, app_info)
    .with_request_timeout(engine.request_timeout());

  let listener = tokio::net::TcpListener::bind(listen)
    .await
    .with_context(|| format!("failed to bind {}", listen))?;

  callgraph_server::serve(listener, state, async {
    if tokio::signal::ctrl_c().await.is_ok() {
      info!("shutdown requested");
    }
  })
  .await
  .context("server failed")?;

  info!("callgraph stopped");
  Ok(())
}

fn run(spec_file: Option<PathBuf>, engine: EngineArgs) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_async(spec_file, engine).await })
}

async fn run_async(spec_file: Option<PathBuf>, engine: EngineArgs) -> Result<()> {
  let spec = match spec_file {
    Some(path) => {
      let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read call spec: {}", path.display()))?;
      serde_json::from_str::<CallSpec>(&content)
        .with_context(|| format!("failed to parse call spec: {}", path.display()))?
    }
    None => read_spec_from_stdin()?,
  };

  info!(
    node = %spec.display_name(),
    nodes = spec.node_count(),
    depth = spec.depth(),
    "executing call spec"
  );

  let executor = engine.build_executor()?;
  let ctx = CallContext::new().tighten(engine.request_timeout());

  match executor.execute(&spec, &ctx).await {
    NodeOutcome::Success(result) => {
      println!("{}", serde_json::to_string_pretty(&result)?);
      Ok(())
    }
    NodeOutcome::Failure(failure) => bail!("call spec execution failed: {}", failure),
  }
}

fn read_spec_from_stdin() -> Result<CallSpec> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    bail!("no call spec given: pass a file or pipe JSON on stdin");
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read call spec from stdin")?;

  serde_json::from_str(&input).context("failed to parse call spec JSON from stdin")
}
