//! Supply domain - DEX reserves, LP supply and spot price

mod supply_reader;

pub use supply_reader::get_supply;

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Raw DEX storage as returned by the indexer; nat values are base units
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DexStorage {
    #[serde(deserialize_with = "deserialize_nat")]
    pub token1_pool: u128,
    #[serde(deserialize_with = "deserialize_nat")]
    pub token2_pool: u128,
    #[serde(rename = "totalSupply", deserialize_with = "deserialize_nat")]
    pub total_supply: u128,
    #[serde(rename = "lpFee", deserialize_with = "deserialize_nat")]
    pub lp_fee: u128,
}

/// Michelson nats come back as decimal strings; accept plain JSON integers too
fn deserialize_nat<'de, D>(deserializer: D) -> Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Nat {
        Str(String),
        Num(u64),
    }

    match Nat::deserialize(deserializer)? {
        Nat::Str(s) => s
            .parse::<u128>()
            .map_err(|e| de::Error::custom(format!("invalid nat {:?}: {}", s, e))),
        Nat::Num(n) => Ok(n as u128),
    }
}

/// Normalized view of a DEX oriented for a token_in -> token_out swap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Supply {
    /// Units of token_out per unit of token_in
    pub price: Decimal,
    pub token_in_supply: Decimal,
    pub token_out_supply: Decimal,
    /// Raw reserves in base units; minimum-out math runs on these
    pub token_in_reserve: u128,
    pub token_out_reserve: u128,
    /// `None` when the LP figure doesn't fit a `Decimal`; not used for pricing
    pub lp_token_supply: Option<Decimal>,
    pub lp_fees: Option<Decimal>,
    pub token_in_decimals: u32,
    pub token_out_decimals: u32,
    pub dex_contract: String,
}
