mod error;
pub mod registry;
pub mod signer_rpc;

pub use error::Error;
pub use registry::{ChainRecord, ChainRegistry, DEFAULT_REGISTRY_URL};
pub use signer_rpc::{SignerRpcClient, SignerRpcConnector, DEFAULT_SIGNER_URL};
