use crate::error::CliError;
use prometheus::Registry;
use spamtx_chain::{ChainRegistry, SignerRpcConnector, DEFAULT_REGISTRY_URL, DEFAULT_SIGNER_URL};
use spamtx_core::{config::RunConfig, metrics::SpamMetrics, spammer::RunSummary};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use url::Url;

#[derive(Clone, Debug, clap::Args)]
pub struct SpamCliArgs {
    /// Chain name as listed in the registry, e.g. `cosmoshub`.
    pub chain: String,

    /// Keyring name of the sending account.
    #[arg(
        long = "from",
        env = "SPAMTX_FROM",
        long_help = "Name of the key held by the signing sidecar. Every transfer is sent from and to this account."
    )]
    pub signer: String,

    #[arg(
        long,
        env = "SPAMTX_FEES",
        long_help = "Fee coins for each transaction, e.g. `1000uatom`. The same coins are moved by each self-transfer."
    )]
    pub fees: String,

    #[arg(long, env = "SPAMTX_MEMO", long_help = "Memo attached to every transaction.")]
    pub memo: String,

    #[arg(
        long,
        env = "SPAMTX_TPS",
        default_value_t = 10,
        long_help = "Target transactions per second. Slots missed while a submission is in flight are dropped."
    )]
    pub tps: u64,

    #[arg(long, env = "SPAMTX_GAS_LIMIT", long_help = "Gas limit for each transaction.")]
    pub gas_limit: Option<u64>,

    #[arg(
        long,
        env = "SPAMTX_RPC",
        long_help = "RPC endpoint to use instead of the one listed in the registry."
    )]
    pub rpc: Option<String>,

    #[arg(
        long,
        env = "SPAMTX_HEAVY",
        long_help = "Send multi-output transfers that split the fee coins across several outputs."
    )]
    pub heavy: bool,

    #[arg(
        long,
        env = "SPAMTX_HEAVY_OUTPUTS",
        long_help = "Number of outputs per heavy transfer. Derived from --gas-limit when unset."
    )]
    pub heavy_outputs: Option<u64>,

    #[arg(
        long,
        env = "SPAMTX_SIGNER_URL",
        default_value = DEFAULT_SIGNER_URL,
        long_help = "JSON-RPC endpoint of the signing sidecar."
    )]
    pub signer_url: Url,

    #[arg(
        long,
        env = "SPAMTX_REGISTRY_URL",
        default_value = DEFAULT_REGISTRY_URL,
        long_help = "Base URL of the chain registry. Chains are read from <url>/<chain>/chain.json."
    )]
    pub registry_url: Url,
}

impl SpamCliArgs {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            network: self.chain.to_owned(),
            signer: self.signer.to_owned(),
            fees: self.fees.to_owned(),
            memo: self.memo.to_owned(),
            rate: self.tps,
            gas_limit: self.gas_limit,
            rpc: self.rpc.to_owned(),
            heavy: self.heavy,
            heavy_outputs: self.heavy_outputs,
        }
    }
}

/// Runs the spammer until SIGINT or SIGTERM.
pub async fn spam(args: &SpamCliArgs) -> Result<RunSummary, CliError> {
    let config = args.run_config();
    let resolver = ChainRegistry::new(args.registry_url.as_str())?;
    let connector = SignerRpcConnector::new(args.signer_url.as_str());
    let registry = Registry::new();
    let metrics = SpamMetrics::new(&registry)?;

    let cancel = CancellationToken::new();
    let shutdown = tokio::task::spawn(shutdown_signal(cancel.clone()));

    let res = spamtx_core::spammer::spam(
        &config,
        &resolver,
        &connector,
        Some(metrics.clone()),
        cancel,
    )
    .await;
    shutdown.abort();
    let summary = res?;

    println!("Sent {} transactions total.", summary.accepted);
    info!(
        "{} attempts, {} rejected, {} transport errors",
        summary.attempts, summary.rejected, summary.transport_errors
    );
    if let Some(mean) = metrics.mean_latency() {
        info!("mean submit latency: {mean:?}");
    }
    Ok(summary)
}

/// Cancels `cancel` on the first CTRL-C or SIGTERM.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for CTRL-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("CTRL-C received, stopping spammer..."),
        _ = terminate => info!("SIGTERM received, stopping spammer..."),
    }
    cancel.cancel();
}
