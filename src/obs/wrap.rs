use once_cell::sync::OnceCell;
use opentelemetry::{global, KeyValue};
use opentelemetry::metrics::Histogram;
use std::time::Instant;

static HIST: OnceCell<Histogram<f64>> = OnceCell::new();

fn histogram() -> Histogram<f64> {
    HIST.get_or_init(|| {
        let meter = global::meter("swap_engine.wrap");
        meter
            .f64_histogram("op_duration_seconds")
            .with_unit("s")
            .with_description("engine operation duration")
            .build()
    })
    .clone()
}

/// Mede `f` e registra a duração com o atributo `op`. Sem provider global o meter é no-op.
pub fn time<F, T>(op: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = f();
    histogram().record(start.elapsed().as_secs_f64(), &[KeyValue::new("op", op)]);
    out
}
