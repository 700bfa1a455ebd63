//! Coin amounts in the `<amount><denom>[,<amount><denom>...]` notation used for
//! fees, which double as the amount moved by each self-transfer.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr, sync::LazyLock};
use thiserror::Error;

static COIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)(?:\.([0-9]*))?([a-zA-Z][a-zA-Z0-9/:._-]{2,127})$")
        .expect("coin regex must compile")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoinsError {
    #[error("amount string cannot be empty")]
    Empty,

    #[error("invalid coin expression: '{0}'")]
    Invalid(String),

    #[error("duplicate denomination {0}")]
    DuplicateDenom(String),

    #[error("amount overflows in '{0}'")]
    Overflow(String),

    #[error("amount must be greater than zero")]
    Zero,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Coin {
    pub denom: String,
    #[serde(serialize_with = "amount_as_string")]
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

fn amount_as_string<S: Serializer>(amount: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&amount.to_string())
}

/// A set of coins sorted by denomination, never holding a zero amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Builds a normalized set: zero amounts are dropped and entries sorted by denom.
    pub fn new(coins: impl IntoIterator<Item = Coin>) -> Result<Self, CoinsError> {
        let mut coins = coins
            .into_iter()
            .filter(|c| c.amount > 0)
            .collect::<Vec<_>>();
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if let Some(dup) = coins.windows(2).find(|w| w[0].denom == w[1].denom) {
            return Err(CoinsError::DuplicateDenom(dup[0].denom.to_owned()));
        }
        Ok(Self(coins))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Coin> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or_default()
    }

    /// Integer-divides every amount by `divisor`. Denominations that fall to zero
    /// are removed from the result.
    pub fn quo(&self, divisor: u64) -> Coins {
        if divisor == 0 {
            return Coins::default();
        }
        Coins(
            self.0
                .iter()
                .map(|c| Coin::new(&c.denom, c.amount / divisor as u128))
                .filter(|c| c.amount > 0)
                .collect(),
        )
    }

    /// Multiplies every amount by `factor`, saturating at `u128::MAX`.
    pub fn mul(&self, factor: u64) -> Coins {
        Coins(
            self.0
                .iter()
                .map(|c| Coin::new(&c.denom, c.amount.saturating_mul(factor as u128)))
                .filter(|c| c.amount > 0)
                .collect(),
        )
    }
}

impl FromStr for Coins {
    type Err = CoinsError;

    /// Parses a comma-separated coin list. Decimal amounts are truncated to whole units.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Coins::default());
        }
        let coins = s
            .split(',')
            .map(|item| parse_coin(item.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Coins::new(coins)
    }
}

fn parse_coin(item: &str) -> Result<Coin, CoinsError> {
    let caps = COIN_RE
        .captures(item)
        .ok_or_else(|| CoinsError::Invalid(item.to_owned()))?;
    // fractional digits in caps[2] are truncated
    let amount = caps[1]
        .parse::<u128>()
        .map_err(|_| CoinsError::Overflow(item.to_owned()))?;
    Ok(Coin::new(&caps[3], amount))
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = self.0.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        write!(f, "{}", parts.join(","))
    }
}

/// Parses the configured fee string into the amount moved by every self-transfer.
/// Fails on an empty string, malformed input, or a set that sums to zero.
pub fn parse_amount(amount: &str) -> Result<Coins, CoinsError> {
    if amount.trim().is_empty() {
        return Err(CoinsError::Empty);
    }
    let coins = amount.parse::<Coins>()?;
    if coins.is_zero() {
        return Err(CoinsError::Zero);
    }
    Ok(coins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_coin() {
        let amount = parse_amount("1000uatom").unwrap();
        assert_eq!(amount.len(), 1);
        let coin = amount.first().unwrap();
        assert_eq!(coin.denom, "uatom");
        assert_eq!(coin.amount, 1000);
    }

    #[test]
    fn parses_multiple_coins_sorted_by_denom() {
        let amount = parse_amount("1000uatom, 500stake").unwrap();
        assert_eq!(amount.len(), 2);
        assert_eq!(amount.first().unwrap().denom, "stake");
        assert_eq!(amount.to_string(), "500stake,1000uatom");
    }

    #[test]
    fn truncates_decimal_amounts() {
        let amount = parse_amount("1.75uatom").unwrap();
        assert_eq!(amount.amount_of("uatom"), 1);
    }

    #[test]
    fn parses_ibc_denoms() {
        let amount = parse_amount("25ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2").unwrap();
        assert_eq!(amount.len(), 1);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_amount(""), Err(CoinsError::Empty));
        assert_eq!(parse_amount("   "), Err(CoinsError::Empty));
        assert_eq!(
            parse_amount("invalid"),
            Err(CoinsError::Invalid("invalid".to_owned()))
        );
        assert!(matches!(parse_amount("100"), Err(CoinsError::Invalid(_))));
        assert!(matches!(parse_amount("uatom100"), Err(CoinsError::Invalid(_))));
        assert!(matches!(parse_amount("10u"), Err(CoinsError::Invalid(_))));
        assert!(matches!(
            parse_amount("1000uatom,"),
            Err(CoinsError::Invalid(_))
        ));
        assert_eq!(
            parse_amount("1uatom,2uatom"),
            Err(CoinsError::DuplicateDenom("uatom".to_owned()))
        );
    }

    #[test]
    fn rejects_zero_amount() {
        assert_eq!(parse_amount("0uatom"), Err(CoinsError::Zero));
        assert_eq!(parse_amount("0uatom,0stake"), Err(CoinsError::Zero));
        // a zero entry next to a positive one is dropped, not rejected
        let amount = parse_amount("0stake,5uatom").unwrap();
        assert_eq!(amount.to_string(), "5uatom");
    }

    #[test]
    fn quo_drops_underflowed_denoms() {
        let amount = parse_amount("1000uatom,5stake").unwrap();
        let split = amount.quo(10);
        assert_eq!(split.to_string(), "100uatom");
        assert!(parse_amount("5uatom").unwrap().quo(10).is_zero());
    }

    #[test]
    fn serializes_amounts_as_strings() {
        let amount = parse_amount("1000uatom").unwrap();
        let json = serde_json::to_value(&amount).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "denom": "uatom", "amount": "1000" }])
        );
    }
}
