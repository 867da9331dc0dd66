//! Taxa de rede sobre transferências da moeda nativa.
//!
//! A rede cobra do remetente `min(floor(amount * rate), cap)` em cima de cada envio
//! nativo. Para entregar um valor bruto `amount` sem estourar o saldo, o pool
//! primeiro deduz a taxa (`apply_tax`) e envia o líquido; o custo real do envio é
//! `net + compute_tax(net)`, que nunca passa de `amount`.
//!
//! Fixture de referência (rate = 0.001, sem cap):
//! `apply_tax(5_982_000) = 5_976_023` e `compute_tax(5_976_023) = 5_976`.

use std::collections::BTreeSet;

use super::asset::AssetInfo;
use super::error::Result;
use super::guardrails::{checked_add, checked_sub, mul_div_floor};
use super::types::{Decimal, Wad, WAD};

/// Denominação isenta por padrão (a moeda de staking da rede).
pub const DEFAULT_EXEMPT_DENOM: &str = "uluna";

/// Parâmetros de taxa fornecidos pelo host a cada invocação.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxPolicy {
    pub rate: Decimal,
    pub cap: Option<Wad>,
    pub exempt_denoms: BTreeSet<String>,
}

impl Default for TaxPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Resultado de liquidar um envio nativo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaxSettlement {
    /// Valor que chega ao destinatário.
    pub net: Wad,
    /// `amount - net`: quanto foi retido do bruto.
    pub withheld: Wad,
    /// Taxa efetivamente cobrada do remetente sobre `net`.
    pub charged: Wad,
}

impl TaxSettlement {
    /// Custo total do envio para o remetente.
    pub fn sender_cost(&self) -> Result<Wad> {
        checked_add(self.net, self.charged)
    }

    fn untaxed(amount: Wad) -> Self {
        Self { net: amount, withheld: 0, charged: 0 }
    }
}

impl TaxPolicy {
    /// Sem taxa alguma.
    pub fn none() -> Self {
        Self { rate: Decimal::ZERO, cap: None, exempt_denoms: BTreeSet::new() }
    }

    /// Taxa plana com a isenção padrão.
    pub fn flat(rate: Decimal) -> Result<Self> {
        let rate = rate.ensure_unit_interval("tax_rate")?;
        let mut exempt_denoms = BTreeSet::new();
        exempt_denoms.insert(DEFAULT_EXEMPT_DENOM.to_string());
        Ok(Self { rate, cap: None, exempt_denoms })
    }

    pub fn with_cap(mut self, cap: Wad) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn with_exempt(mut self, denom: impl Into<String>) -> Self {
        self.exempt_denoms.insert(denom.into());
        self
    }

    /// Só a moeda nativa não isenta é tributada; tokens nunca.
    pub fn applies_to(&self, info: &AssetInfo) -> bool {
        match info {
            AssetInfo::NativeToken { denom } => {
                !self.rate.is_zero() && !self.exempt_denoms.contains(denom)
            }
            AssetInfo::Token { .. } => false,
        }
    }

    #[inline]
    fn capped(&self, tax: Wad) -> Wad {
        match self.cap {
            Some(cap) => tax.min(cap),
            None => tax,
        }
    }

    /// Taxa cobrada do remetente ao enviar `amount`: `min(floor(amount * rate), cap)`.
    pub fn compute_tax(&self, amount: Wad) -> Result<Wad> {
        Ok(self.capped(self.rate.mul_floor(amount)?))
    }

    /// Líquido entregável a partir de um bruto `amount`:
    /// `amount - min(amount - floor(amount * 1e18 / (1e18 + rate)), cap)`.
    pub fn apply_tax(&self, amount: Wad) -> Result<Wad> {
        let denom = checked_add(WAD, self.rate.atoms())?;
        let grossed_down = mul_div_floor(amount, WAD, denom)?;
        let withheld = self.capped(checked_sub(amount, grossed_down)?);
        checked_sub(amount, withheld)
    }

    /// Liquida um envio de `amount` do ativo `info`.
    pub fn settle(&self, info: &AssetInfo, amount: Wad) -> Result<TaxSettlement> {
        if !self.applies_to(info) {
            return Ok(TaxSettlement::untaxed(amount));
        }
        let net = self.apply_tax(amount)?;
        let charged = self.compute_tax(net)?;
        Ok(TaxSettlement { net, withheld: amount - net, charged })
    }
}
