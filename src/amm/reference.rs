//! Referência de alta precisão ("goldens") baseada em **BigInt/BigRational**
//! para o par x·y=k com comissão sobre a saída e taxa de rede no lado nativo.
//!
//! Objetivos desta referência:
//! 1. Calcular os resultados **contínuos/exatos** (sem quantização) do swap e do
//!    mint inicial.
//! 2. Reproduzir a **política de arredondamento** do core (floor em todas as
//!    fronteiras) em BigUint, como oráculo independente do core em U256.
//! 3. Medir o crescimento do invariante, `Δk/k`, do core discreto.
//!
//! Não entra no caminho de produção; serve a testes e goldens.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use super::error::{AmmError, Result};
use super::error_catalog::AmmErrorCode;
use super::swap;
use super::types::{Decimal, Ppm, Wad, PPM_SCALE, WAD};

// -------------------------
// Helpers de conversão
// -------------------------
#[inline]
fn bu(v: Wad) -> BigUint {
    BigUint::from(v)
}
#[inline]
fn q_int(v: Wad) -> BigRational {
    BigRational::from_integer(BigInt::from(v))
}
#[inline]
fn q_ratio(n: u128, d: u128) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}
#[inline]
fn q_decimal(d: Decimal) -> BigRational {
    q_ratio(d.atoms(), WAD)
}

fn to_u128(v: BigUint) -> Result<Wad> {
    v.to_u128()
        .ok_or_else(|| AmmError::new(AmmErrorCode::ArithmeticOverflow).with_context("op", "reference"))
}

fn floor_rat_to_u128(r: &BigRational) -> Result<Wad> {
    r.floor()
        .to_integer()
        .to_u128()
        .ok_or_else(|| AmmError::new(AmmErrorCode::ArithmeticOverflow).with_context("op", "reference"))
}

fn ensure_reserves(x: Wad, y: Wad) -> Result<()> {
    if x == 0 || y == 0 {
        return Err(AmmError::new(AmmErrorCode::PoolNotInitialized));
    }
    Ok(())
}

// -------------------------
// Contínuo/exato (sem quantização)
// -------------------------
/// Saída contínua após comissão exata: `(1 - fee) * y * dx / (x + dx)`.
pub fn continuous_amount_out(x: Wad, y: Wad, dx: Wad, commission_ppm: Ppm) -> Result<BigRational> {
    ensure_reserves(x, y)?;
    let gross = q_int(y) * q_int(dx) / (q_int(x) + q_int(dx));
    let keep = BigRational::from_integer(BigInt::from(1)) - q_ratio(commission_ppm.into(), PPM_SCALE.into());
    Ok(gross * keep)
}

/// Líquido contínuo após taxa de rede: `amount / (1 + rate)`.
pub fn continuous_after_tax(amount: Wad, rate: Decimal) -> BigRational {
    q_int(amount) / (BigRational::from_integer(BigInt::from(1)) + q_decimal(rate))
}

/// Shares iniciais contínuas ao quadrado (`x*y`); o core devolve `floor(sqrt)`.
pub fn initial_shares_floor(x: Wad, y: Wad) -> Result<Wad> {
    to_u128((bu(x) * bu(y)).sqrt())
}

// -------------------------
// Política (replica o core em Big-precision)
// -------------------------
/// Saída pós-comissão com a política do core: `floor(y*dx/(x+dx))` e comissão floor.
pub fn policy_amount_out(x: Wad, y: Wad, dx: Wad, commission_ppm: Ppm) -> Result<Wad> {
    ensure_reserves(x, y)?;
    let gross = bu(y) * bu(dx) / (bu(x) + bu(dx));
    let fee = &gross * BigUint::from(commission_ppm) / BigUint::from(PPM_SCALE);
    to_u128(gross - fee)
}

/// Dedução de taxa com a política do core: `amount - (amount - floor(amount / (1+rate)))`.
pub fn policy_apply_tax(amount: Wad, rate: Decimal) -> Result<Wad> {
    let net = bu(amount) * bu(WAD) / (bu(WAD) + bu(rate.atoms()));
    to_u128(net)
}

// -------------------------
// Estruturas de comparação (goldens)
// -------------------------
#[derive(Debug, Clone)]
pub struct RefOut {
    pub out_core: Wad,
    pub out_policy: Wad,
    pub out_cont_floor: Wad,
    pub out_cont: BigRational,
    /// `(k1 - k0) / k0` do core, com o pool debitado pelo valor pós-comissão.
    pub dk_over_k_core: BigRational,
}

fn dk_over_k(x: Wad, y: Wad, dx: Wad, out: Wad) -> BigRational {
    let k0 = BigInt::from(bu(x) * bu(y));
    let k1 = BigInt::from((bu(x) + bu(dx)) * (bu(y) - bu(out)));
    BigRational::new(k1 - &k0, k0)
}

/// Compara o **core** com a referência (swap X→Y).
pub fn golden_amount_out(x: Wad, y: Wad, dx: Wad, commission_ppm: Ppm) -> Result<RefOut> {
    let out_core = swap::get_amount_out(x, y, dx, commission_ppm)?;
    let out_policy = policy_amount_out(x, y, dx, commission_ppm)?;
    let out_cont = continuous_amount_out(x, y, dx, commission_ppm)?;
    let out_cont_floor = floor_rat_to_u128(&out_cont)?;
    let dk_over_k_core = dk_over_k(x, y, dx, out_core);
    Ok(RefOut { out_core, out_policy, out_cont_floor, out_cont, dk_over_k_core })
}

/// `true` quando o desvio do core está em [0, +∞): o pool nunca perde k.
pub fn never_loses_k(g: &RefOut) -> bool {
    g.dk_over_k_core >= BigRational::zero()
}
