//! Configuração do processo lida do ambiente.
//!
//! | variável                       | padrão                  |
//! |--------------------------------|-------------------------|
//! | `SWAP_ENGINE_COMMISSION_PPM`   | `3000`                  |
//! | `SWAP_ENGINE_TAX_RATE`         | `0` (ou o padrão do chamador) |
//! | `SWAP_ENGINE_TAX_CAP`          | sem cap                 |
//! | `SWAP_ENGINE_TAX_EXEMPT`       | `uluna`                 |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT`  | `http://localhost:4318` |
//! | `SWAP_ENGINE_COMMIT_SHA`       | `unknown`               |

use std::collections::BTreeSet;

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::OnceCell;

use crate::amm::types::{Decimal, Ppm, Wad, DEFAULT_COMMISSION_PPM, PPM_SCALE};
use crate::amm::{FeeSchedule, TaxPolicy};

pub const ENV_COMMISSION_PPM: &str = "SWAP_ENGINE_COMMISSION_PPM";
pub const ENV_TAX_RATE: &str = "SWAP_ENGINE_TAX_RATE";
pub const ENV_TAX_CAP: &str = "SWAP_ENGINE_TAX_CAP";
pub const ENV_TAX_EXEMPT: &str = "SWAP_ENGINE_TAX_EXEMPT";
pub const ENV_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
pub const ENV_COMMIT_SHA: &str = "SWAP_ENGINE_COMMIT_SHA";

pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4318";
pub const SERVICE_NAME: &str = "swap-engine-core";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub otlp_endpoint: String,
    pub commit_sha: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub commission_ppm: Ppm,
    /// `None` quando a variável não foi definida.
    pub tax_rate: Option<Decimal>,
    pub tax_cap: Option<Wad>,
    pub tax_exempt: BTreeSet<String>,
    pub telemetry: TelemetryConfig,
}

static PROCESS: OnceCell<EngineConfig> = OnceCell::new();

impl EngineConfig {
    /// Lê o ambiente do processo.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Mesmo parser de [`EngineConfig::from_env`] sobre uma fonte arbitrária.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let commission_ppm = match get(ENV_COMMISSION_PPM) {
            Some(raw) => raw
                .parse::<Ppm>()
                .with_context(|| format!("{ENV_COMMISSION_PPM}={raw} não é um inteiro"))?,
            None => DEFAULT_COMMISSION_PPM,
        };
        if commission_ppm > PPM_SCALE {
            bail!("{ENV_COMMISSION_PPM}={commission_ppm} acima de {PPM_SCALE}");
        }

        let tax_rate = match get(ENV_TAX_RATE) {
            Some(raw) => raw
                .parse::<Decimal>()
                .and_then(|d| d.ensure_unit_interval("tax_rate"))
                .map(Some)
                .map_err(|e| anyhow!("{ENV_TAX_RATE}={raw}: {}", e.to_user_string()))?,
            None => None,
        };

        let tax_cap = get(ENV_TAX_CAP)
            .map(|raw| raw.parse::<Wad>().with_context(|| format!("{ENV_TAX_CAP}={raw} não é um inteiro")))
            .transpose()?;

        let tax_exempt = match get(ENV_TAX_EXEMPT) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .collect(),
            None => BTreeSet::from([crate::amm::tax::DEFAULT_EXEMPT_DENOM.to_string()]),
        };

        let telemetry = TelemetryConfig {
            service_name: SERVICE_NAME.to_string(),
            otlp_endpoint: get(ENV_OTLP_ENDPOINT)
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OTLP_ENDPOINT.to_string()),
            commit_sha: get(ENV_COMMIT_SHA).unwrap_or_else(|| "unknown".to_string()),
        };

        Ok(Self { commission_ppm, tax_rate, tax_cap, tax_exempt, telemetry })
    }

    /// Configuração do processo, lida uma única vez.
    pub fn process() -> Result<&'static EngineConfig> {
        PROCESS.get_or_try_init(Self::from_env)
    }

    pub fn tax_policy(&self) -> TaxPolicy {
        self.tax_policy_or(Decimal::ZERO)
    }

    /// Como [`EngineConfig::tax_policy`], usando `default_rate` se `SWAP_ENGINE_TAX_RATE` não veio.
    pub fn tax_policy_or(&self, default_rate: Decimal) -> TaxPolicy {
        TaxPolicy {
            rate: self.tax_rate.unwrap_or(default_rate),
            cap: self.tax_cap,
            exempt_denoms: self.tax_exempt.clone(),
        }
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule::new(self.commission_ppm, self.tax_policy())
    }

    pub fn fee_schedule_or(&self, default_rate: Decimal) -> FeeSchedule {
        FeeSchedule::new(self.commission_ppm, self.tax_policy_or(default_rate))
    }
}
