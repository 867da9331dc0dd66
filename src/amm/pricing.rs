//! Preço à vista, spread e checagem de tolerância de slippage.
//! Spread é medido sobre a saída bruta da curva (antes de comissão e taxa).

use super::asset::AssetInfo;
use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;
use super::guardrails::{ensure_initialized, mul_div_floor, mul_u128_to_u256};
use super::pool::Pool;
use super::types::{Decimal, Wad, U256, WAD};

/// Preço à vista do ativo ofertado em unidades do outro lado: `r_out / r_in`.
pub fn spot_price(pool: &Pool, offer: &AssetInfo) -> Result<Decimal> {
    let side = pool.side_of(offer)?;
    let (r0, r1) = pool.reserve_amounts();
    ensure_initialized(r0, r1)?;
    let (r_in, r_out) = if side == 0 { (r0, r1) } else { (r1, r0) };
    Decimal::from_ratio(r_out, r_in)
}

/// Saída sem impacto de preço: `floor(dx * r_out / r_in)`.
pub fn ideal_spot_output(reserve_in: Wad, reserve_out: Wad, amount_in: Wad) -> Result<Wad> {
    mul_div_floor(amount_in, reserve_out, reserve_in)
}

/// `(ideal - actual) / ideal`, truncado; 0 quando não há perda.
pub fn compute_spread(ideal: Wad, actual: Wad) -> Result<Decimal> {
    if ideal == 0 || actual >= ideal {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_ratio(ideal - actual, ideal)
}

/// Comparação exata `(reference - actual) / reference > max`, sem truncar a razão.
pub fn exceeds_max_spread(reference: Wad, actual: Wad, max_spread: Decimal) -> bool {
    if reference == 0 || actual >= reference {
        return false;
    }
    let lhs = mul_u128_to_u256(reference - actual, WAD);
    let rhs = U256::from(max_spread.atoms()) * U256::from(reference);
    lhs > rhs
}

/// Retorno esperado dado um belief price (ofertado por unidade recebida).
pub fn expected_return_at_belief(amount_in: Wad, belief_price: Decimal) -> Result<Wad> {
    if belief_price.is_zero() {
        return Err(AmmError::new(AmmErrorCode::InvalidRate)
            .with_context("value", belief_price)
            .with_context("rate", "belief_price"));
    }
    mul_div_floor(amount_in, WAD, belief_price.atoms())
}

/// Mínimo aceitável para a UI: `floor(out * (1 - tolerance))`.
pub fn min_receive(out: Wad, tolerance: Decimal) -> Result<Wad> {
    let tolerance = if tolerance > Decimal::ONE { Decimal::ONE } else { tolerance };
    let factor = Decimal::raw(WAD - tolerance.atoms());
    factor.mul_floor(out)
}
