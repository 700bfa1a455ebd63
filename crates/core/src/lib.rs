pub mod client;
pub mod coins;
pub mod composer;
pub mod config;
pub mod error;
pub mod metrics;
pub mod spammer;

pub type Result<T> = std::result::Result<T, error::Error>;
pub use error::Error;
