//! Liquidez (x·y=k): mint inicial, depósito proporcional e resgate de shares.
//! Políticas:
//! - shares_mint: **floor**
//! - montantes aceitos no depósito: **floor** (o lado limitante entra inteiro)
//! - amounts_out em burn: **floor**

use super::asset::Asset;
use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;
use super::guardrails::{
    checked_add, checked_sub, ensure_k_non_decreasing, ensure_nonzero, isqrt_u256, mul_div_floor,
    mul_u128_to_u256, u256_to_u128_checked,
};
use super::pool::Pool;
use super::tax::TaxPolicy;
use super::types::Wad;

/// Recibo de depósito.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiquidityReceipt {
    pub lp_shares_issued: Wad,
    /// Quanto de cada lado entrou nas reservas.
    pub accepted: [Wad; 2],
    /// Excedente que o host deve devolver ao depositante.
    pub refund: [Wad; 2],
}

/// Recibo de resgate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    pub shares_burned: Wad,
    /// Debitado das reservas.
    pub gross: [Wad; 2],
    /// Entregue ao LP, já sem taxa de rede.
    pub delivered: [Asset; 2],
    pub tax: [Wad; 2],
}

/// Mint **inicial** de shares: `floor(sqrt(x*y))`.
pub fn initial_mint(x: Wad, y: Wad) -> Result<Wad> {
    let shares = u256_to_u128_checked(isqrt_u256(mul_u128_to_u256(x, y)))?;
    if shares == 0 {
        return Err(AmmError::new(AmmErrorCode::InsufficientInitialLiquidity)
            .with_context("amount0", x)
            .with_context("amount1", y));
    }
    Ok(shares)
}

/// Depósito em pool existente. A razão `min(dx/x, dy/y)` é escolhida por
/// multiplicação cruzada; retorna `(shares, aceito_x, aceito_y)`.
pub fn proportional_mint(x: Wad, y: Wad, dx: Wad, dy: Wad, total_shares: Wad) -> Result<(Wad, Wad, Wad)> {
    if x == 0 || y == 0 || total_shares == 0 {
        return Err(AmmError::new(AmmErrorCode::DivisionByZero).with_context("op", "proportional_mint"));
    }
    // dx/x <= dy/y  <=>  dx*y <= dy*x
    let x_limits = mul_u128_to_u256(dx, y) <= mul_u128_to_u256(dy, x);
    let (num, den) = if x_limits { (dx, x) } else { (dy, y) };

    let shares = mul_div_floor(total_shares, num, den)?;
    if shares == 0 {
        return Err(AmmError::new(AmmErrorCode::ZeroLiquidityContribution)
            .with_context("amount0", dx)
            .with_context("amount1", dy));
    }
    let (ax, ay) = if x_limits { (dx, mul_div_floor(y, num, den)?) } else { (mul_div_floor(x, num, den)?, dy) };
    Ok((shares, ax, ay))
}

/// Burn proporcional: `(floor(x * burn / S), floor(y * burn / S))`.
pub fn remove_liquidity(x: Wad, y: Wad, burn_shares: Wad, total_shares: Wad) -> Result<(Wad, Wad)> {
    ensure_nonzero(burn_shares)?;
    if burn_shares > total_shares {
        return Err(AmmError::new(AmmErrorCode::InsufficientShares)
            .with_context("shares", burn_shares)
            .with_context("supply", total_shares));
    }
    let x_out = mul_div_floor(x, burn_shares, total_shares)?;
    let y_out = mul_div_floor(y, burn_shares, total_shares)?;
    if x_out == 0 && y_out == 0 {
        return Err(AmmError::new(AmmErrorCode::ZeroLiquidityContribution).with_context("shares", burn_shares));
    }
    Ok((x_out, y_out))
}

/// Depósito atômico de `[amount0, amount1]` na ordem das reservas do pool.
pub fn provide_liquidity(pool: &Pool, amounts: [Wad; 2]) -> Result<(Pool, LiquidityReceipt)> {
    let (x, y) = pool.reserve_amounts();
    let [dx, dy] = amounts;

    let (shares, ax, ay) = if pool.is_empty() {
        (initial_mint(dx, dy)?, dx, dy)
    } else {
        proportional_mint(x, y, dx, dy, pool.lp_total_supply())?
    };

    let x1 = checked_add(x, ax)?;
    let y1 = checked_add(y, ay)?;
    let supply = checked_add(pool.lp_total_supply(), shares)?;
    ensure_k_non_decreasing((x, y), (x1, y1))?;

    let receipt = LiquidityReceipt {
        lp_shares_issued: shares,
        accepted: [ax, ay],
        refund: [dx - ax, dy - ay],
    };
    Ok((pool.with_state((x1, y1), supply), receipt))
}

/// Como [`provide_liquidity`], mas aceita os ativos em qualquer ordem.
pub fn provide_assets(pool: &Pool, deposits: &[Asset; 2]) -> Result<(Pool, LiquidityReceipt)> {
    let first = pool.side_of(&deposits[0].info)?;
    let second = pool.side_of(&deposits[1].info)?;
    if first == second {
        return Err(AmmError::new(AmmErrorCode::AssetMismatch).with_context("asset", &deposits[1].info));
    }
    let mut amounts = [0; 2];
    amounts[first] = deposits[0].amount;
    amounts[second] = deposits[1].amount;
    provide_liquidity(pool, amounts)
}

/// Resgate atômico de `shares`. As reservas caem pelo bruto; lados nativos são
/// entregues após a taxa de rede.
pub fn withdraw_liquidity(pool: &Pool, shares: Wad, tax: &TaxPolicy) -> Result<(Pool, WithdrawReceipt)> {
    let (x, y) = pool.reserve_amounts();
    let supply = pool.lp_total_supply();
    let (gx, gy) = remove_liquidity(x, y, shares, supply)?;

    let x1 = checked_sub(x, gx)?;
    let y1 = checked_sub(y, gy)?;
    let supply1 = checked_sub(supply, shares)?;

    let [r0, r1] = pool.reserves();
    let s0 = tax.settle(&r0.info, gx)?;
    let s1 = tax.settle(&r1.info, gy)?;

    let receipt = WithdrawReceipt {
        shares_burned: shares,
        gross: [gx, gy],
        delivered: [r0.info.with_amount(s0.net), r1.info.with_amount(s1.net)],
        tax: [s0.withheld, s1.withheld],
    };
    Ok((pool.with_state((x1, y1), supply1), receipt))
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::asset::AssetInfo;
    use crate::amm::types::Decimal;

    fn mir() -> AssetInfo {
        AssetInfo::token("terra1mirror")
    }

    fn uusd() -> AssetInfo {
        AssetInfo::native("uusd")
    }

    fn empty() -> Pool {
        Pool::new(mir(), uusd()).unwrap()
    }

    #[test]
    fn t_initial_mint_fixture() {
        let (pool, r) = provide_liquidity(&empty(), [69_000_000, 420_000_000]).unwrap();
        assert_eq!(r.lp_shares_issued, 170_235_131);
        assert_eq!(r.accepted, [69_000_000, 420_000_000]);
        assert_eq!(r.refund, [0, 0]);
        assert_eq!(pool.reserve_amounts(), (69_000_000, 420_000_000));
        assert_eq!(pool.lp_total_supply(), 170_235_131);
    }

    #[test]
    fn t_initial_mint_zero_side() {
        let err = provide_liquidity(&empty(), [0, 420_000_000]).unwrap_err();
        assert_eq!(err.code, AmmErrorCode::InsufficientInitialLiquidity);
    }

    #[test]
    fn t_proportional_limited_by_second_side() {
        let (pool, _) = provide_liquidity(&empty(), [1_000_000, 1_000_000]).unwrap();
        let (next, r) = provide_liquidity(&pool, [200_000, 100_000]).unwrap();
        assert_eq!(r.lp_shares_issued, 100_000);
        assert_eq!(r.accepted, [100_000, 100_000]);
        assert_eq!(r.refund, [100_000, 0]);
        assert_eq!(next.reserve_amounts(), (1_100_000, 1_100_000));
        assert_eq!(next.lp_total_supply(), 1_100_000);
        assert!(next.k() > pool.k());
    }

    #[test]
    fn t_proportional_rounds_down() {
        let pool = Pool::from_state([mir().with_amount(3), uusd().with_amount(7)], 4).unwrap();
        let (_, r) = provide_liquidity(&pool, [2, 100]).unwrap();
        // razão = 2/3 ⇒ shares floor(8/3)=2, aceita (2, floor(14/3)=4)
        assert_eq!(r.lp_shares_issued, 2);
        assert_eq!(r.accepted, [2, 4]);
        assert_eq!(r.refund, [0, 96]);
    }

    #[test]
    fn t_zero_contribution_is_atomic() {
        let (pool, _) = provide_liquidity(&empty(), [1_000_000_000, 1_000_000_000]).unwrap();
        let before = pool.clone();
        let err = provide_liquidity(&pool, [1_000, 0]).unwrap_err();
        assert_eq!(err.code, AmmErrorCode::ZeroLiquidityContribution);
        assert_eq!(pool, before);
    }

    #[test]
    fn t_provide_assets_any_order() {
        let deposits = [uusd().with_amount(420_000_000), mir().with_amount(69_000_000)];
        let (pool, r) = provide_assets(&empty(), &deposits).unwrap();
        assert_eq!(r.lp_shares_issued, 170_235_131);
        assert_eq!(pool.reserve_amounts(), (69_000_000, 420_000_000));
        let dup = [uusd().with_amount(1), uusd().with_amount(1)];
        assert_eq!(provide_assets(&empty(), &dup).unwrap_err().code, AmmErrorCode::AssetMismatch);
    }

    #[test]
    fn t_withdraw_partial_and_full() {
        let (pool, r) = provide_liquidity(&empty(), [1_000_000, 3_000_000]).unwrap();
        let supply = r.lp_shares_issued;
        let (half, w) = withdraw_liquidity(&pool, supply / 2, &TaxPolicy::none()).unwrap();
        assert_eq!(w.gross, [mul_div_floor(1_000_000, supply / 2, supply).unwrap(), mul_div_floor(3_000_000, supply / 2, supply).unwrap()]);
        assert_eq!(half.lp_total_supply(), supply - supply / 2);

        let rest = half.lp_total_supply();
        let (emptied, _) = withdraw_liquidity(&half, rest, &TaxPolicy::none()).unwrap();
        assert!(emptied.is_empty());
        assert_eq!(emptied.reserve_amounts(), (0, 0));
    }

    #[test]
    fn t_withdraw_taxes_native_leg() {
        let (pool, r) = provide_liquidity(&empty(), [69_000_000, 420_000_000]).unwrap();
        let tax = TaxPolicy::flat(Decimal::permille(1)).unwrap();
        let (_, w) = withdraw_liquidity(&pool, r.lp_shares_issued, &tax).unwrap();
        assert_eq!(w.gross, [69_000_000, 420_000_000]);
        assert_eq!(w.delivered[0].amount, 69_000_000);
        assert_eq!(w.delivered[1].amount, tax.apply_tax(420_000_000).unwrap());
        assert_eq!(w.tax[1], 420_000_000 - w.delivered[1].amount);
    }

    #[test]
    fn t_withdraw_errors() {
        let (pool, r) = provide_liquidity(&empty(), [1_000, 1_000]).unwrap();
        let none = TaxPolicy::none();
        assert_eq!(withdraw_liquidity(&pool, 0, &none).unwrap_err().code, AmmErrorCode::ZeroAmount);
        assert_eq!(
            withdraw_liquidity(&pool, r.lp_shares_issued + 1, &none).unwrap_err().code,
            AmmErrorCode::InsufficientShares
        );
    }
}
