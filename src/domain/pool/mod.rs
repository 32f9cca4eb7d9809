//! Pool domain - Plenty token registry and DEX lookup

mod pair_locator;
mod pool_directory;

pub use pair_locator::{find_dex, DexRegistry};
pub use pool_directory::{get_pools, pairs_of, TokenRegistry};

use serde::{Deserialize, Serialize};

/// Token entry from the Plenty token registry, keyed by symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntry {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `None` for native tez
    #[serde(default)]
    pub address: Option<String>,
    pub decimals: u32,
    #[serde(default)]
    pub standard: Option<String>,
    #[serde(default)]
    pub token_id: Option<u64>,
    #[serde(default)]
    pub pairs: Vec<String>,
}

/// One side of a DEX pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DexToken {
    pub symbol: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpToken {
    #[serde(default)]
    pub address: Option<String>,
    pub decimals: u32,
}

/// DEX contract servicing exactly one unordered token pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexDescriptor {
    pub address: String,
    pub token1: DexToken,
    pub token2: DexToken,
    pub lp_token: LpToken,
}

impl DexDescriptor {
    /// True when this DEX trades `a` against `b`, in either order
    pub fn serves(&self, a: &str, b: &str) -> bool {
        (self.token1.symbol == a && self.token2.symbol == b)
            || (self.token1.symbol == b && self.token2.symbol == a)
    }

    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.token1.symbol, self.token2.symbol)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_decodes_registry_shape() {
        let raw = r#"{
            "address": "KT1Dhy1gVW3PSC9cms9QJ7xPMPPpip2V9aA6",
            "token1": { "symbol": "USDt", "decimals": 6, "standard": "FA2" },
            "token2": { "symbol": "XTZ", "decimals": 6 },
            "lpToken": { "address": "KT1AVbWyM8E7DptyBCu4B5J5B7Nswkq7Skc6", "decimals": 18 },
            "type": "xtz",
            "fees": 0.25
        }"#;
        let dex: DexDescriptor = serde_json::from_str(raw).unwrap();
        assert_eq!(dex.token1.symbol, "USDt");
        assert_eq!(dex.lp_token.decimals, 18);
        assert!(dex.serves("XTZ", "USDt"));
        assert!(dex.serves("USDt", "XTZ"));
        assert!(!dex.serves("XTZ", "XTZ"));
    }

    #[test]
    fn test_token_entry_without_address() {
        let raw = r#"{ "symbol": "XTZ", "decimals": 6, "address": null, "pairs": ["USDt", "CTez"] }"#;
        let entry: TokenEntry = serde_json::from_str(raw).unwrap();
        assert!(entry.address.is_none());
        assert_eq!(entry.pairs, vec!["USDt", "CTez"]);
    }
}
