//! CLI entrypoint for the RWA verification oracle
//!
//! This is the main binary that wires together all layers using
//! dependency injection, then runs as a long-lived listener reacting to
//! verification requests submitted upstream.

use anyhow::{Result, bail};
use clap::Parser;
use oracle_application::{
    EvaluateAgentsUseCase, EvidenceIndex, LedgerGateway, ProcessRequestUseCase, ProgressNotifier,
    ValuationAgent,
};
use oracle_domain::{AgentKind, PipelineStage, RequestId};
use oracle_infrastructure::{
    ConfigLoader, FileConfig, FileEvidenceIndex, HttpMeasurementProvider, HttpValuationAgent,
    JsonRpcLedgerGateway, PinataEvidenceStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "rwa-oracle",
    version,
    about = "AI-panel verification oracle for real-world assets"
)]
struct Cli {
    /// Path to a configuration file (highest-priority file source)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Process one request id and exit (operational retry path)
    #[arg(long)]
    request_id: Option<String>,

    /// Print the archived evidence reference for a request id and exit
    #[arg(long, value_name = "REQUEST_ID")]
    evidence: Option<String>,

    /// Drain a single poll of pending requests and exit
    #[arg(long)]
    once: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Progress notifier that mirrors stage events into the log stream
struct LogProgress;

impl ProgressNotifier for LogProgress {
    fn on_stage_start(&self, stage: PipelineStage) {
        debug!(%stage, "stage started");
    }

    fn on_agent_complete(&self, agent: &AgentKind, success: bool) {
        debug!(%agent, success, "agent invocation finished");
    }

    fn on_stage_complete(&self, stage: PipelineStage) {
        debug!(%stage, "stage completed");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console + oracle.log, filtered by -v repetition
    let filter = match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vv or more
    };

    let file_appender = tracing_appender::rolling::never(".", "oracle.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    // Load and validate configuration before touching the network;
    // report every missing value at once.
    let config = ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?;
    let missing = config.missing_required();
    if !missing.is_empty() {
        bail!(
            "missing required configuration values: {}",
            missing.join(", ")
        );
    }

    info!("RWA oracle starting");
    info!(router = %config.ledger.router_address, "ledger target");
    info!(
        panel = %config
            .agents
            .endpoints
            .iter()
            .map(|e| e.kind.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        "valuation panel"
    );

    // === Dependency Injection ===
    let client = reqwest::Client::new();

    let agents: Vec<Arc<dyn ValuationAgent>> = config
        .agents
        .endpoints
        .iter()
        .map(|endpoint| {
            Arc::new(HttpValuationAgent::new(
                client.clone(),
                endpoint.parse_kind(),
                endpoint.url.clone(),
                endpoint.api_key.clone(),
            )) as Arc<dyn ValuationAgent>
        })
        .collect();
    let pool = EvaluateAgentsUseCase::new(agents, config.agents.timeout());

    let measurement = Arc::new(HttpMeasurementProvider::new(
        client.clone(),
        config.measurement.endpoint.clone(),
        config.measurement.timeout(),
    ));
    let store = Arc::new(PinataEvidenceStore::new(
        client.clone(),
        config.storage.api_url.clone(),
        config.storage.jwt.clone(),
    ));
    let index = Arc::new(FileEvidenceIndex::new(config.storage.index_path.clone()));
    let ledger: Arc<dyn LedgerGateway> = Arc::new(JsonRpcLedgerGateway::new(
        client,
        config.ledger.rpc_url.clone(),
    ));

    let use_case = ProcessRequestUseCase::new(
        measurement,
        pool,
        store,
        Arc::clone(&index) as Arc<dyn EvidenceIndex>,
        Arc::clone(&ledger),
        config.pipeline_params(),
    );

    // Evidence lookup mode: resolve a request to its archived reference
    if let Some(id) = &cli.evidence {
        let Some(request_id) = RequestId::try_new(id.as_str()) else {
            bail!("request id cannot be empty");
        };
        match index.lookup(&request_id).await? {
            Some(reference) => {
                println!("{}/{}", config.storage.gateway_url, reference);
                return Ok(());
            }
            None => bail!("no evidence archived for request {request_id}"),
        }
    }

    // Single-request mode: the request-level retry path
    if let Some(id) = &cli.request_id {
        return process_single(&use_case, &ledger, id).await;
    }

    run_listener(&use_case, &ledger, &config, cli.once).await
}

/// Reprocess one request by id and report the outcome
async fn process_single(
    use_case: &ProcessRequestUseCase,
    ledger: &Arc<dyn LedgerGateway>,
    id: &str,
) -> Result<()> {
    let Some(request_id) = RequestId::try_new(id) else {
        bail!("request id cannot be empty");
    };

    let Some(request) = ledger.request_by_id(&request_id).await? else {
        bail!("request {request_id} not found on the router");
    };

    match use_case.process(&request, &LogProgress).await {
        Ok(output) => {
            println!("request {}: {}", output.request_id, output.outcome);
            println!("evidence:    {}", output.evidence);
            println!("transaction: {}", output.transaction);
            Ok(())
        }
        Err(e) => bail!("request {request_id} failed at {}: {e}", e.stage()),
    }
}

/// Poll the router for pending requests and process each sequentially
async fn run_listener(
    use_case: &ProcessRequestUseCase,
    ledger: &Arc<dyn LedgerGateway>,
    config: &FileConfig,
    once: bool,
) -> Result<()> {
    let interval: Duration = config.ledger.poll_interval();
    info!(
        poll_interval_secs = interval.as_secs(),
        "listening for verification requests"
    );

    loop {
        match ledger.pending_requests().await {
            Ok(pending) => {
                if !pending.is_empty() {
                    info!(count = pending.len(), "pending requests");
                }
                for request in &pending {
                    // A failed request was already logged by the use case
                    // and stays pending on the router; the next poll
                    // retries it as a fresh run.
                    let _ = use_case.process(request, &LogProgress).await;
                }
            }
            Err(e) => warn!("failed to poll pending requests: {e}"),
        }

        if once {
            return Ok(());
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
