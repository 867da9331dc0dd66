//! Swap no par x·y=k com comissão sobre a saída e taxa de rede no lado nativo.
//! - get_amount_out: saída após comissão para um input `dx`
//! - get_amount_in: menor `dx` que entrega ao menos `dy` após comissão (minimalidade garantida)
//! - swap / simulate / reverse_simulate: operações sobre o `Pool`
//!
//! Política de arredondamento: saída da curva **floor**, comissão **floor**,
//! limite superior do input **ceil** antes da busca binária.

use tracing::warn;

use super::asset::{Asset, AssetInfo};
use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;
use super::guardrails::{
    checked_add, checked_sub, constant_product_output, ensure_initialized, ensure_k_non_decreasing,
    ensure_nonzero, mul_u128_to_u256, u256_to_u128_checked,
};
use super::pool::{FeeSchedule, Pool};
use super::pricing::{compute_spread, exceeds_max_spread, expected_return_at_belief, ideal_spot_output};
use super::types::{Decimal, Ppm, Wad, PPM_SCALE, U256};

#[inline]
fn ceil_div_u256(n: U256, d: U256) -> U256 {
    // (n + d - 1) / d, assumindo d>0
    (n + (d - U256::from(1u8))) / d
}

#[inline]
fn ensure_commission(commission_ppm: Ppm) -> Result<()> {
    if commission_ppm > PPM_SCALE {
        return Err(AmmError::new(AmmErrorCode::InvalidRate)
            .with_context("rate", "commission_ppm")
            .with_context("value", commission_ppm));
    }
    Ok(())
}

/// Comissão sobre a saída bruta: `floor(gross * ppm / 1e6)`.
#[inline]
pub fn commission_on(gross: Wad, commission_ppm: Ppm) -> Result<Wad> {
    let n = U256::from(gross) * U256::from(commission_ppm as u64);
    u256_to_u128_checked(n / U256::from(PPM_SCALE as u64))
}

/// Saída bruta e comissão para `dx` entrando em `x`.
fn gross_and_fee(x: Wad, y: Wad, dx: Wad, commission_ppm: Ppm) -> Result<(Wad, Wad)> {
    let gross = constant_product_output(x, y, dx)?;
    let fee = commission_on(gross, commission_ppm)?;
    Ok((gross, fee))
}

/// Saída após comissão (antes de taxa de rede) ao enviar `dx` de X e receber Y.
pub fn get_amount_out(x: Wad, y: Wad, dx: Wad, commission_ppm: Ppm) -> Result<Wad> {
    ensure_initialized(x, y)?;
    ensure_nonzero(dx)?;
    ensure_commission(commission_ppm)?;
    let (gross, fee) = gross_and_fee(x, y, dx, commission_ppm)?;
    checked_sub(gross, fee)
}

/// Menor `dx` tal que `get_amount_out(x, y, dx, fee) >= dy`.
/// 1) antes da comissão: b = ceil(dy * 1e6 / (1e6 - fee))
/// 2) chute: dx = ceil(x * b / (y - b))
/// 3) expande `hi` até satisfazer (se necessário)
/// 4) busca binária no menor `dx`
pub fn get_amount_in(x: Wad, y: Wad, dy: Wad, commission_ppm: Ppm) -> Result<Wad> {
    ensure_initialized(x, y)?;
    ensure_nonzero(dy)?;
    ensure_commission(commission_ppm)?;
    let insufficient = || {
        AmmError::new(AmmErrorCode::InsufficientPoolLiquidity)
            .with_context("ask", dy)
            .with_context("reserve", y)
    };
    if dy >= y {
        return Err(insufficient());
    }
    let keep_ppm = (PPM_SCALE - commission_ppm) as u64;
    if keep_ppm == 0 {
        return Err(AmmError::new(AmmErrorCode::InvalidRate)
            .with_context("rate", "commission_ppm")
            .with_context("value", commission_ppm));
    }

    // -------- upper bound --------
    let before_fee = u256_to_u128_checked(ceil_div_u256(
        U256::from(dy) * U256::from(PPM_SCALE as u64),
        U256::from(keep_ppm),
    ))?;
    if before_fee >= y {
        return Err(insufficient());
    }
    let guess = ceil_div_u256(mul_u128_to_u256(x, before_fee), U256::from(y - before_fee));
    let mut hi = u256_to_u128_checked(guess)?.max(1);

    let satisfies = |dx: Wad| -> bool {
        matches!(get_amount_out(x, y, dx, commission_ppm), Ok(out) if out >= dy)
    };

    while !satisfies(hi) {
        hi = hi.checked_mul(2).ok_or_else(|| {
            AmmError::new(AmmErrorCode::ArithmeticOverflow).with_context("op", "get_amount_in")
        })?;
    }

    // -------- busca binária: menor dx com out ≥ dy --------
    let mut lo: Wad = 1;
    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if satisfies(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(hi)
}

/// Limites de slippage do chamador.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapLimits {
    pub max_spread: Option<Decimal>,
    pub belief_price: Option<Decimal>,
}

impl SwapLimits {
    pub fn max_spread(max_spread: Decimal) -> Self {
        Self { max_spread: Some(max_spread), belief_price: None }
    }

    /// Belief price em unidades ofertadas por unidade recebida; só vale junto com `max_spread`.
    pub fn with_belief_price(mut self, belief_price: Decimal) -> Self {
        self.belief_price = Some(belief_price);
        self
    }
}

/// Cotação de um swap: para onde foi cada micro-unidade do `return_amount`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapQuote {
    pub offer_asset: AssetInfo,
    pub ask_asset: AssetInfo,
    pub offer_amount: Wad,
    /// Saída bruta da curva.
    pub return_amount: Wad,
    /// Comissão retida no pool.
    pub fee_amount: Wad,
    /// Taxa de rede retida do valor pós-comissão.
    pub tax_amount: Wad,
    /// Entregue ao trader.
    pub net_amount: Wad,
    /// Saída ideal à vista menos a saída bruta.
    pub spread_amount: Wad,
    pub spread: Decimal,
    /// Quanto sai da reserva de saída (líquido + taxa cobrada do pool).
    pub reserve_debit: Wad,
}

impl SwapQuote {
    pub fn after_fee(&self) -> Wad {
        self.return_amount - self.fee_amount
    }
}

/// Resultado da simulação reversa.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReverseQuote {
    pub offer_amount: Wad,
    pub quote: SwapQuote,
}

struct Priced {
    side: usize,
    reserve_in: Wad,
    reserve_out: Wad,
    quote: SwapQuote,
}

fn price(pool: &Pool, offer: &Asset, fees: &FeeSchedule) -> Result<Priced> {
    ensure_nonzero(offer.amount)?;
    ensure_commission(fees.commission_ppm)?;
    fees.tax.rate.ensure_unit_interval("tax_rate")?;
    let side = pool.side_of(&offer.info)?;
    let (r0, r1) = pool.reserve_amounts();
    if pool.is_empty() {
        return Err(AmmError::new(AmmErrorCode::PoolNotInitialized)
            .with_context("reserve0", r0)
            .with_context("reserve1", r1));
    }
    ensure_initialized(r0, r1)?;
    let (reserve_in, reserve_out) = if side == 0 { (r0, r1) } else { (r1, r0) };
    let ask_asset = pool.reserves()[1 - side].info.clone();

    let (gross, fee) = gross_and_fee(reserve_in, reserve_out, offer.amount, fees.commission_ppm)?;
    let after_fee = checked_sub(gross, fee)?;
    let settlement = fees.tax.settle(&ask_asset, after_fee)?;
    let ideal = ideal_spot_output(reserve_in, reserve_out, offer.amount)?;

    let quote = SwapQuote {
        offer_asset: offer.info.clone(),
        ask_asset,
        offer_amount: offer.amount,
        return_amount: gross,
        fee_amount: fee,
        tax_amount: settlement.withheld,
        net_amount: settlement.net,
        spread_amount: ideal.saturating_sub(gross),
        spread: compute_spread(ideal, gross)?,
        reserve_debit: settlement.sender_cost()?,
    };
    Ok(Priced { side, reserve_in, reserve_out, quote })
}

fn assert_max_spread(limits: &SwapLimits, quote: &SwapQuote, ideal: Wad) -> Result<()> {
    let Some(max_spread) = limits.max_spread else {
        return Ok(());
    };
    let max_spread = max_spread.ensure_unit_interval("max_spread")?;
    let reference = match limits.belief_price {
        Some(belief) => expected_return_at_belief(quote.offer_amount, belief)?,
        None => ideal,
    };
    if exceeds_max_spread(reference, quote.return_amount, max_spread) {
        let spread = compute_spread(reference, quote.return_amount)?;
        warn!(%spread, %max_spread, offer = quote.offer_amount, "max spread assertion failed");
        return Err(AmmError::new(AmmErrorCode::MaxSpreadExceeded)
            .with_context("spread", spread)
            .with_context("max_spread", max_spread));
    }
    Ok(())
}

/// Cotação sem limites e sem tocar no pool.
pub fn simulate(pool: &Pool, offer: &Asset, fees: &FeeSchedule) -> Result<SwapQuote> {
    price(pool, offer, fees).map(|p| p.quote)
}

/// Swap atômico: devolve o novo estado e a cotação, ou erro com `pool` intacto.
pub fn swap(pool: &Pool, offer: &Asset, limits: SwapLimits, fees: &FeeSchedule) -> Result<(Pool, SwapQuote)> {
    let Priced { side, reserve_in, reserve_out, quote } = price(pool, offer, fees)?;

    let ideal = checked_add(quote.return_amount, quote.spread_amount)?;
    assert_max_spread(&limits, &quote, ideal)?;

    if quote.after_fee() >= reserve_out {
        return Err(AmmError::new(AmmErrorCode::InsufficientPoolLiquidity)
            .with_context("ask", quote.after_fee())
            .with_context("reserve", reserve_out));
    }

    let new_in = checked_add(reserve_in, quote.offer_amount)?;
    let new_out = checked_sub(reserve_out, quote.reserve_debit)?;
    ensure_k_non_decreasing((reserve_in, reserve_out), (new_in, new_out))?;

    let amounts = if side == 0 { (new_in, new_out) } else { (new_out, new_in) };
    Ok((pool.with_state(amounts, pool.lp_total_supply()), quote))
}

/// Menor oferta cujo retorno pós-comissão cobre `ask.amount`.
pub fn reverse_simulate(pool: &Pool, ask: &Asset, fees: &FeeSchedule) -> Result<ReverseQuote> {
    ensure_nonzero(ask.amount)?;
    let ask_side = pool.side_of(&ask.info)?;
    let (r0, r1) = pool.reserve_amounts();
    ensure_initialized(r0, r1)?;
    let (reserve_in, reserve_out) = if ask_side == 1 { (r0, r1) } else { (r1, r0) };
    let offer_info = pool.reserves()[1 - ask_side].info.clone();

    let offer_amount = get_amount_in(reserve_in, reserve_out, ask.amount, fees.commission_ppm)?;
    let quote = simulate(pool, &offer_info.with_amount(offer_amount), fees)?;
    Ok(ReverseQuote { offer_amount, quote })
}
