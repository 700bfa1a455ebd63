use crate::{error::CliError, util::bold};
use spamtx_chain::ChainRegistry;
use url::Url;

pub async fn chain_info(chain: &str, registry_url: &Url) -> Result<(), CliError> {
    let registry = ChainRegistry::new(registry_url.as_str())?;
    let record = registry.fetch_chain(chain).await?;
    let info = record.network_info()?;

    println!("{} {}", bold("chain:"), record.chain_name);
    println!("{} {}", bold("rpc:"), info.rpc_endpoint);
    println!("{} {}", bold("prefix:"), info.address_prefix);
    Ok(())
}
