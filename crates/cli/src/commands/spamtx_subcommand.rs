use clap::Subcommand;
use spamtx_chain::DEFAULT_REGISTRY_URL;
use url::Url;

use super::spam::SpamCliArgs;

#[derive(Debug, Subcommand)]
pub enum SpamtxSubcommand {
    #[command(
        name = "spam",
        long_about = "Submit self-transfers from one account at a fixed rate until interrupted."
    )]
    Spam {
        #[command(flatten)]
        args: Box<SpamCliArgs>,
    },

    #[command(
        name = "chain-info",
        long_about = "Print the RPC endpoint and address prefix resolved for a chain."
    )]
    ChainInfo {
        /// Chain name as listed in the registry, e.g. `cosmoshub`.
        chain: String,

        #[arg(
            long,
            env = "SPAMTX_REGISTRY_URL",
            default_value = DEFAULT_REGISTRY_URL,
            long_help = "Base URL of the chain registry. Chains are read from <url>/<chain>/chain.json."
        )]
        registry_url: Url,
    },
}
