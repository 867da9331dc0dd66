//! Identidade dos ativos do par: token fungível (contrato) ou moeda nativa (denom).
use core::fmt;

use super::types::Wad;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetInfo {
    Token { contract_addr: String },
    NativeToken { denom: String },
}

impl AssetInfo {
    pub fn token(contract_addr: impl Into<String>) -> Self {
        Self::Token { contract_addr: contract_addr.into() }
    }

    pub fn native(denom: impl Into<String>) -> Self {
        Self::NativeToken { denom: denom.into() }
    }

    pub fn with_amount(&self, amount: Wad) -> Asset {
        Asset { info: self.clone(), amount }
    }
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { contract_addr } => f.write_str(contract_addr),
            Self::NativeToken { denom } => f.write_str(denom),
        }
    }
}

/// Montante tipado em micro-unidades.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Asset {
    pub info: AssetInfo,
    pub amount: Wad,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.info)
    }
}
