//! Tipos básicos do engine (micro-unidades inteiras) + U256 para intermediários.
//! Taxas de protocolo em ppm; taxas de rede, spread e belief price em `Decimal` (escala 1e18).

use core::fmt;
use core::str::FromStr;

use uint::construct_uint;
construct_uint! {
    /// Inteiro de 256 bits para contas intermediárias seguras.
    pub struct U256(4);
}

use super::error::{self, AmmError};
use super::error_catalog::AmmErrorCode;

pub type Wad = u128;   // escala 1e18 quando usado como fração
pub type Ppm = u32;    // 0..=1_000_000

pub const WAD: Wad = 1_000_000_000_000_000_000u128; // 1e18
pub const PPM_SCALE: Ppm = 1_000_000;                // 1e6 (ppm)
pub const WAD_DECIMALS: usize = 18;

/// Comissão padrão do par: 0,30%.
pub const DEFAULT_COMMISSION_PPM: Ppm = 3_000;

/// Fração racional não negativa com 18 casas (átomos de 1e-18).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(Wad);

impl Decimal {
    pub const ZERO: Decimal = Decimal(0);
    pub const ONE: Decimal = Decimal(WAD);

    /// Constrói a partir dos átomos brutos (1 = 1e-18).
    pub const fn raw(atoms: Wad) -> Self {
        Self(atoms)
    }

    pub const fn atoms(&self) -> Wad {
        self.0
    }

    pub const fn permille(x: u64) -> Self {
        Self(x as u128 * (WAD / 1_000))
    }

    pub const fn percent(x: u64) -> Self {
        Self(x as u128 * (WAD / 100))
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `num / den` truncado para baixo.
    pub fn from_ratio(num: u128, den: u128) -> error::Result<Self> {
        if den == 0 {
            return Err(AmmError::new(AmmErrorCode::DivisionByZero).with_context("op", "from_ratio"));
        }
        let q = (U256::from(num) * U256::from(WAD)) / U256::from(den);
        if q > U256::from(u128::MAX) {
            return Err(AmmError::new(AmmErrorCode::ArithmeticOverflow).with_context("op", "from_ratio"));
        }
        Ok(Self(q.as_u128()))
    }

    /// Converte uma taxa em ppm.
    pub fn from_ppm(ppm: Ppm) -> Self {
        Self(u128::from(ppm) * (WAD / u128::from(PPM_SCALE)))
    }

    /// `floor(amount * self)`.
    pub fn mul_floor(&self, amount: u128) -> error::Result<u128> {
        let q = (U256::from(amount) * U256::from(self.0)) / U256::from(WAD);
        if q > U256::from(u128::MAX) {
            return Err(AmmError::new(AmmErrorCode::ArithmeticOverflow).with_context("op", "mul_floor"));
        }
        Ok(q.as_u128())
    }

    /// Valida que a fração está em [0, 1].
    pub fn ensure_unit_interval(self, name: &str) -> error::Result<Self> {
        if self.0 > WAD {
            return Err(AmmError::new(AmmErrorCode::InvalidRate)
                .with_context("rate", name)
                .with_context("value", self));
        }
        Ok(self)
    }
}

impl FromStr for Decimal {
    type Err = AmmError;

    fn from_str(input: &str) -> error::Result<Self> {
        let invalid = || AmmError::new(AmmErrorCode::InvalidRate).with_context("value", input);
        let trimmed = input.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > WAD_DECIMALS
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let whole_v: u128 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let mut frac_v: u128 = if frac.is_empty() { 0 } else { frac.parse().map_err(|_| invalid())? };
        for _ in frac.len()..WAD_DECIMALS {
            frac_v *= 10;
        }
        let atoms = whole_v
            .checked_mul(WAD)
            .and_then(|w| w.checked_add(frac_v))
            .ok_or_else(invalid)?;
        Ok(Self(atoms))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WAD;
        let frac = self.0 % WAD;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}
