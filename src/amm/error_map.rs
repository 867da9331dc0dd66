//! Mapeamento entre condições de domínio e códigos de erro do engine.
use crate::amm::error_catalog::AmmErrorCode;
use crate::amm::types::{Ppm, Wad, PPM_SCALE};

/// Classifica um swap a partir dos inputs brutos, sem executar nada.
/// `reserves` é `(reserve_in, reserve_out)`.
pub fn from_swap_inputs(amount_in: Wad, reserves: (Wad, Wad), commission_ppm: Ppm) -> Option<AmmErrorCode> {
    if amount_in == 0 {
        return Some(AmmErrorCode::ZeroAmount);
    }
    if reserves.0 == 0 || reserves.1 == 0 {
        return Some(AmmErrorCode::PoolNotInitialized);
    }
    if commission_ppm > PPM_SCALE {
        return Some(AmmErrorCode::InvalidRate);
    }
    if reserves.0.checked_add(amount_in).is_none() {
        return Some(AmmErrorCode::ArithmeticOverflow);
    }
    None
}
