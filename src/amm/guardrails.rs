//! Validações e helpers numéricos seguros do engine.
//! Toda multiplicação de montantes passa por U256; toda divisão trunca (floor),
//! sempre a favor do pool.

use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;
use super::types::{Wad, U256};
use crate::amm_bail;

#[inline]
fn overflow(op: &'static str) -> AmmError {
    AmmError::new(AmmErrorCode::ArithmeticOverflow).with_context("op", op)
}

#[inline]
pub fn ensure_nonzero(amount: Wad) -> Result<()> {
    if amount == 0 {
        amm_bail!(AmmErrorCode::ZeroAmount, amount => amount);
    }
    Ok(())
}

/// Exige pool com as duas reservas positivas.
#[inline]
pub fn ensure_initialized(x: Wad, y: Wad) -> Result<()> {
    if x == 0 || y == 0 {
        amm_bail!(AmmErrorCode::PoolNotInitialized, reserve0 => x, reserve1 => y);
    }
    Ok(())
}

#[inline]
pub fn checked_add(a: Wad, b: Wad) -> Result<Wad> {
    a.checked_add(b).ok_or_else(|| overflow("add"))
}

#[inline]
pub fn checked_sub(a: Wad, b: Wad) -> Result<Wad> {
    a.checked_sub(b).ok_or_else(|| overflow("sub"))
}

#[inline]
pub fn mul_u128_to_u256(a: Wad, b: Wad) -> U256 {
    U256::from(a) * U256::from(b)
}

#[inline]
pub fn u256_to_u128_checked(v: U256) -> Result<Wad> {
    if v > U256::from(u128::MAX) {
        Err(overflow("downcast"))
    } else {
        Ok(v.as_u128())
    }
}

/// `floor(a * b / d)` com intermediário de 256 bits.
pub fn mul_div_floor(a: Wad, b: Wad, d: Wad) -> Result<Wad> {
    if d == 0 {
        return Err(AmmError::new(AmmErrorCode::DivisionByZero).with_context("op", "mul_div"));
    }
    u256_to_u128_checked(mul_u128_to_u256(a, b) / U256::from(d))
}

/// Raiz quadrada inteira (floor) por busca binária.
pub fn isqrt_u256(n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    let one = U256::from(1u8);
    let mut low = U256::zero();
    // sqrt(n) < 2^128 para todo n de 256 bits
    let mut high = if n > U256::from(u128::MAX) { U256::from(u128::MAX) } else { n };
    while low < high {
        let mid = (low + high + one) >> 1;
        // mid*mid <= n  <=>  mid <= n/mid
        if mid <= n / mid {
            low = mid;
        } else {
            high = mid - one;
        }
    }
    low
}

/// Produto das reservas `x·y` (k).
#[inline]
pub fn product(x: Wad, y: Wad) -> U256 {
    mul_u128_to_u256(x, y)
}

/// Saída bruta da curva x·y=k: `floor(y * dx / (x + dx))`, i.e. `y - ceil(x*y / (x + dx))`.
/// O resíduo do truncamento fica no pool; `(x+dx)·(y-out) >= x·y` sempre.
pub fn constant_product_output(reserve_in: Wad, reserve_out: Wad, amount_in: Wad) -> Result<Wad> {
    if reserve_in == 0 {
        return Err(AmmError::new(AmmErrorCode::DivisionByZero)
            .with_context("op", "constant_product_output"));
    }
    let x1 = reserve_in
        .checked_add(amount_in)
        .ok_or_else(|| overflow("reserve_in + amount_in"))?;
    mul_div_floor(reserve_out, amount_in, x1)
}

/// Pós-condição de commit: k nunca diminui.
pub fn ensure_k_non_decreasing(before: (Wad, Wad), after: (Wad, Wad)) -> Result<()> {
    let k0 = product(before.0, before.1);
    let k1 = product(after.0, after.1);
    if k1 < k0 {
        amm_bail!(AmmErrorCode::InvariantViolated, k_before => k0, k_after => k1);
    }
    Ok(())
}
