//! Replay do cenário de referência: depósito inicial, swap taxado e rejeição
//! por max spread. Com `--otlp` exporta traces e métricas via OTLP/HTTP.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use swap_engine_core::amm::{AssetInfo, Decimal, Pool, SwapLimits, U256};
use swap_engine_core::config::EngineConfig;
use swap_engine_core::telemetry::{self, Telemetry};

fn k_growth(before: U256, after: U256) -> f64 {
    if before.is_zero() {
        return 0.0;
    }
    let delta = after.saturating_sub(before);
    // razão em ppb para caber em u64 antes de virar f64
    let ppb = delta.saturating_mul(U256::from(1_000_000_000u64)) / before;
    ppb.low_u64() as f64 / 1e9
}

fn main() -> Result<()> {
    let cfg = EngineConfig::process()?;
    let otlp = std::env::args().any(|a| a == "--otlp");
    let tel: Option<Telemetry> = if otlp {
        Some(telemetry::init(&cfg.telemetry)?)
    } else {
        telemetry::init_console()?;
        None
    };

    let mir = AssetInfo::token("terra1mirrortoken");
    let uusd = AssetInfo::native("uusd");
    let mut pool = Pool::new(mir.clone(), uusd)?;

    // sem SWAP_ENGINE_TAX_RATE o replay usa a taxa de 0.1% do cenário de referência
    let fees = cfg.fee_schedule_or(Decimal::permille(1));
    info!(commission_ppm = fees.commission_ppm, tax_rate = %fees.tax.rate, "fee schedule");

    let span = telemetry::make_info_span("provide_liquidity", 0, &cfg.telemetry.commit_sha);
    let receipt = span.in_scope(|| pool.apply_provide([69_000_000, 420_000_000]))?;
    info!(shares = receipt.lp_shares_issued, "pool inicializado");

    let span = telemetry::make_info_span("swap", 1, &cfg.telemetry.commit_sha);
    let k0 = pool.k();
    let t0 = Instant::now();
    let quote = span
        .in_scope(|| pool.apply_swap(&mir.with_amount(1_000_000), SwapLimits::default(), &fees))
        ?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
    let (r0, r1) = pool.reserve_amounts();
    info!(
        net = quote.net_amount,
        fee = quote.fee_amount,
        tax = quote.tax_amount,
        reserve0 = r0,
        reserve1 = r1,
        "swap executado"
    );
    if let Some(tel) = &tel {
        tel.record_op("swap", elapsed_ms, k_growth(k0, pool.k()));
    }

    let span = telemetry::make_info_span("swap", 2, &cfg.telemetry.commit_sha);
    let before = pool.clone();
    let limits = SwapLimits::max_spread(Decimal::percent(1));
    match span.in_scope(|| pool.apply_swap(&mir.with_amount(50_000_000), limits, &fees)) {
        Ok(q) => warn!(net = q.net_amount, "swap grande aceito inesperadamente"),
        Err(e) => {
            info!(error = %e.to_log_json(), unchanged = (pool == before), "swap grande rejeitado");
        }
    }

    if let Some(tel) = tel {
        tel.shutdown()?;
    }
    Ok(())
}
