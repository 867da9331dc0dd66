//! Agregado `Pool`: duas reservas em ordem fixa + supply de LP.
//!
//! As operações do engine recebem `&Pool` e devolvem um `Pool` novo; só os
//! `apply_*` escrevem em `&mut self`, e somente depois que tudo passou.

use tracing::debug;

use super::asset::{Asset, AssetInfo};
use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;
use super::guardrails::product;
use super::liquidity::{self, LiquidityReceipt, WithdrawReceipt};
use super::swap::{self, SwapLimits, SwapQuote};
use super::tax::TaxPolicy;
use super::types::{Ppm, Wad, U256, DEFAULT_COMMISSION_PPM};
use crate::obs::wrap;

/// Comissão do protocolo + taxa de rede vigente na invocação.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    pub commission_ppm: Ppm,
    pub tax: TaxPolicy,
}

impl FeeSchedule {
    pub fn new(commission_ppm: Ppm, tax: TaxPolicy) -> Self {
        Self { commission_ppm, tax }
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_COMMISSION_PPM, TaxPolicy::none())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pool {
    reserves: [Asset; 2],
    lp_total_supply: Wad,
}

impl Pool {
    /// Pool vazio para o par `(info0, info1)`.
    pub fn new(info0: AssetInfo, info1: AssetInfo) -> Result<Self> {
        if info0 == info1 {
            return Err(AmmError::new(AmmErrorCode::IdenticalAssets).with_context("asset", &info0));
        }
        Ok(Self {
            reserves: [info0.with_amount(0), info1.with_amount(0)],
            lp_total_supply: 0,
        })
    }

    /// Reconstrói um estado persistido pelo host, validando I2.
    pub fn from_state(reserves: [Asset; 2], lp_total_supply: Wad) -> Result<Self> {
        let mut pool = Self::new(reserves[0].info.clone(), reserves[1].info.clone())?;
        let (r0, r1) = (reserves[0].amount, reserves[1].amount);
        let empty = r0 == 0 && r1 == 0;
        let consistent = if lp_total_supply == 0 { empty } else { r0 > 0 && r1 > 0 };
        if !consistent {
            return Err(AmmError::new(AmmErrorCode::InvariantViolated)
                .with_context("reserve0", r0)
                .with_context("reserve1", r1)
                .with_context("lp_total_supply", lp_total_supply));
        }
        pool.reserves = reserves;
        pool.lp_total_supply = lp_total_supply;
        Ok(pool)
    }

    pub fn reserves(&self) -> &[Asset; 2] {
        &self.reserves
    }

    pub fn reserve_amounts(&self) -> (Wad, Wad) {
        (self.reserves[0].amount, self.reserves[1].amount)
    }

    pub fn lp_total_supply(&self) -> Wad {
        self.lp_total_supply
    }

    pub fn is_empty(&self) -> bool {
        self.lp_total_supply == 0
    }

    /// Produto das reservas (k).
    pub fn k(&self) -> U256 {
        let (r0, r1) = self.reserve_amounts();
        product(r0, r1)
    }

    /// Índice do lado do par que casa com `info`.
    pub fn side_of(&self, info: &AssetInfo) -> Result<usize> {
        self.reserves
            .iter()
            .position(|r| &r.info == info)
            .ok_or_else(|| AmmError::new(AmmErrorCode::AssetMismatch).with_context("asset", info))
    }

    pub(crate) fn with_state(&self, amounts: (Wad, Wad), lp_total_supply: Wad) -> Self {
        let mut next = self.clone();
        next.reserves[0].amount = amounts.0;
        next.reserves[1].amount = amounts.1;
        next.lp_total_supply = lp_total_supply;
        next
    }

    /// Executa o swap e comita o novo estado; em erro `self` fica intacto.
    pub fn apply_swap(&mut self, offer: &Asset, limits: SwapLimits, fees: &FeeSchedule) -> Result<SwapQuote> {
        let (next, quote) = wrap::time("swap", || swap::swap(self, offer, limits, fees))?;
        debug!(
            offer = %offer,
            net = quote.net_amount,
            fee = quote.fee_amount,
            tax = quote.tax_amount,
            spread = %quote.spread,
            "swap committed"
        );
        *self = next;
        Ok(quote)
    }

    /// Deposita `[amount0, amount1]` e comita.
    pub fn apply_provide(&mut self, amounts: [Wad; 2]) -> Result<LiquidityReceipt> {
        let (next, receipt) = wrap::time("provide_liquidity", || liquidity::provide_liquidity(self, amounts))?;
        debug!(
            shares = receipt.lp_shares_issued,
            accepted0 = receipt.accepted[0],
            accepted1 = receipt.accepted[1],
            "liquidity provided"
        );
        *self = next;
        Ok(receipt)
    }

    /// Queima `shares` e comita.
    pub fn apply_withdraw(&mut self, shares: Wad, tax: &TaxPolicy) -> Result<WithdrawReceipt> {
        let (next, receipt) = wrap::time("withdraw_liquidity", || liquidity::withdraw_liquidity(self, shares, tax))?;
        debug!(shares, gross0 = receipt.gross[0], gross1 = receipt.gross[1], "liquidity withdrawn");
        *self = next;
        Ok(receipt)
    }
}
