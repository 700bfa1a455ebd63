use crate::{
    coins::{Coin, Coins},
    config::RunConfig,
};
use serde::Serialize;

/// Gas reserved for the transaction itself when sizing heavy transfers from a gas limit.
pub const HEAVY_BASE_GAS: u64 = 50_000;
/// Approximate gas consumed by each output of a multi-send.
pub const HEAVY_GAS_PER_OUTPUT: u64 = 15_000;
pub const DEFAULT_HEAVY_OUTPUTS: u64 = 10;
/// Upper bound on outputs per heavy transfer. Counts derived from a gas limit
/// are clamped to it; an explicit count above it fails validation.
pub const MAX_HEAVY_OUTPUTS: u64 = 1_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "@type")]
pub enum TxMessage {
    #[serde(rename = "/cosmos.bank.v1beta1.MsgSend")]
    Send(MsgSend),
    #[serde(rename = "/cosmos.bank.v1beta1.MsgMultiSend")]
    MultiSend(MsgMultiSend),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Coins,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MsgMultiSend {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Input {
    pub address: String,
    pub coins: Coins,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Output {
    pub address: String,
    pub coins: Coins,
}

/// Number of outputs in a heavy transfer.
///
/// An explicit count wins. Otherwise the count is sized to fill `gas_limit`,
/// and when that yields nothing (no limit, or a limit below the base cost)
/// [`DEFAULT_HEAVY_OUTPUTS`] is used. The result never exceeds [`MAX_HEAVY_OUTPUTS`].
pub fn heavy_output_count(explicit: Option<u64>, gas_limit: Option<u64>) -> u64 {
    if let Some(count) = explicit.filter(|c| *c > 0) {
        return count.min(MAX_HEAVY_OUTPUTS);
    }
    gas_limit
        .and_then(|gas| gas.checked_sub(HEAVY_BASE_GAS))
        .map(|gas| gas / HEAVY_GAS_PER_OUTPUT)
        .filter(|count| *count > 0)
        .map(|count| count.min(MAX_HEAVY_OUTPUTS))
        .unwrap_or(DEFAULT_HEAVY_OUTPUTS)
}

/// How a transfer amount is spread over the outputs of a heavy transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeavySplit {
    pub output_count: u64,
    pub per_output: Coins,
    /// Set when the even split came out empty and every output carries one
    /// unit of the first denomination instead. The total then no longer
    /// matches the configured amount.
    pub fallback_applied: bool,
}

impl HeavySplit {
    /// Splits `amount` evenly. A denomination whose share rounds down to zero is
    /// left out of the transfer while the others still divide.
    pub fn new(amount: &Coins, output_count: u64) -> Self {
        let per_output = amount.quo(output_count);
        if !per_output.is_zero() {
            return Self {
                output_count,
                per_output,
                fallback_applied: false,
            };
        }
        match amount.first() {
            Some(first) => Self {
                output_count,
                per_output: Coins::new([Coin::new(&first.denom, 1)]).unwrap_or_default(),
                fallback_applied: true,
            },
            None => Self {
                output_count,
                per_output,
                fallback_applied: false,
            },
        }
    }

    pub fn total(&self) -> Coins {
        self.per_output.mul(self.output_count)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxShape {
    Simple,
    Heavy { output_count: u64 },
}

/// Builds the self-transfer sent on every slot.
#[derive(Clone, Debug)]
pub struct TransactionComposer {
    address: String,
    amount: Coins,
    shape: TxShape,
}

impl TransactionComposer {
    pub fn new(address: impl Into<String>, amount: Coins, config: &RunConfig) -> Self {
        let shape = if config.heavy {
            TxShape::Heavy {
                output_count: heavy_output_count(config.heavy_outputs, config.gas_limit()),
            }
        } else {
            TxShape::Simple
        };
        Self {
            address: address.into(),
            amount,
            shape,
        }
    }

    pub fn shape(&self) -> TxShape {
        self.shape
    }

    pub fn amount(&self) -> &Coins {
        &self.amount
    }

    pub fn compose(&self) -> TxMessage {
        match self.shape {
            TxShape::Simple => TxMessage::Send(MsgSend {
                from_address: self.address.to_owned(),
                to_address: self.address.to_owned(),
                amount: self.amount.to_owned(),
            }),
            TxShape::Heavy { output_count } => {
                let split = HeavySplit::new(&self.amount, output_count);
                self.multi_send(&split)
            }
        }
    }

    fn multi_send(&self, split: &HeavySplit) -> TxMessage {
        let inputs = vec![Input {
            address: self.address.to_owned(),
            coins: split.total(),
        }];
        let outputs = (0..split.output_count)
            .map(|_| Output {
                address: self.address.to_owned(),
                coins: split.per_output.to_owned(),
            })
            .collect();
        TxMessage::MultiSend(MsgMultiSend { inputs, outputs })
    }
}
