mod commands;
mod error;
mod util;

use commands::{SpamtxCli, SpamtxSubcommand};
use error::CliError;

#[tokio::main]
async fn main() -> miette::Result<()> {
    util::init_tracing();
    let args = SpamtxCli::parse_args();
    run(args).await?;
    Ok(())
}

async fn run(args: SpamtxCli) -> Result<(), CliError> {
    match args.command {
        SpamtxSubcommand::Spam { args } => {
            commands::spam(&args).await?;
        }
        SpamtxSubcommand::ChainInfo {
            chain,
            registry_url,
        } => commands::chain_info(&chain, &registry_url).await?,
    }
    Ok(())
}
