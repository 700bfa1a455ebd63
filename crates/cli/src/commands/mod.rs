mod chain_info;
mod spamtx_subcommand;
pub mod spam;

use clap::Parser;

pub use chain_info::chain_info;
pub use spam::spam;
pub use spamtx_subcommand::SpamtxSubcommand;

#[derive(Parser, Debug)]
#[command(
    name = "spamtx",
    version,
    about = "Send a steady stream of self-transfers to a Cosmos chain."
)]
pub struct SpamtxCli {
    #[command(subcommand)]
    pub command: SpamtxSubcommand,
}

impl SpamtxCli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
