use anyhow::Result;

use opentelemetry::{
    global,
    metrics::{Histogram, MeterProvider as _},
    trace::TracerProvider as _,
    KeyValue,
};
use opentelemetry_otlp::{MetricExporter, Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{metrics::SdkMeterProvider, resource::Resource, trace::SdkTracerProvider};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, Registry};

use crate::config::TelemetryConfig;
use crate::obs::tracingx::filter_from_env;

pub struct Telemetry {
    pub tracer_provider: SdkTracerProvider,
    pub meter_provider: SdkMeterProvider,
    pub swap_latency_ms: Histogram<f64>,
    pub invariant_growth_rel: Histogram<f64>,
}

impl Telemetry {
    /// Registra latência e crescimento relativo de k de uma operação.
    pub fn record_op(&self, op: &'static str, elapsed_ms: f64, k_growth_rel: f64) {
        let attrs = [KeyValue::new("op", op)];
        self.swap_latency_ms.record(elapsed_ms, &attrs);
        self.invariant_growth_rel.record(k_growth_rel, &attrs);
    }

    pub fn shutdown(self) -> Result<()> {
        self.meter_provider.force_flush()?;
        self.tracer_provider.shutdown()?;
        self.meter_provider.shutdown()?;
        Ok(())
    }
}

pub fn init(cfg: &TelemetryConfig) -> Result<Telemetry> {
    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", cfg.service_name.clone()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("git.commit.sha", cfg.commit_sha.clone()),
        ])
        .build();

    // ---- Traces (OTLP/HTTP) ----
    let span_exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(format!("{}/v1/traces", cfg.otlp_endpoint))
        .build()?;
    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(resource.clone())
        .with_batch_exporter(span_exporter)
        .build();

    // ---- Métricas (OTLP/HTTP) ----
    let metric_exporter = MetricExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(format!("{}/v1/metrics", cfg.otlp_endpoint))
        .build()?;
    let meter_provider = SdkMeterProvider::builder()
        .with_resource(resource)
        .with_periodic_exporter(metric_exporter)
        .build();

    // Globais
    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());

    // tracing -> OTel
    let tracer = tracer_provider.tracer(cfg.service_name.clone());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let subscriber = Registry::default()
        .with(filter_from_env())
        .with(fmt_layer)
        .with(otel_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    let meter = meter_provider.meter("swap_engine_core");
    let swap_latency_ms = meter
        .f64_histogram("swap_latency_ms")
        .with_unit("ms")
        .with_description("Latency of engine operations in ms")
        .build();
    let invariant_growth_rel = meter
        .f64_histogram("invariant_growth_rel")
        .with_unit("1")
        .with_description("Relative growth of k = reserve0*reserve1 per operation")
        .build();

    Ok(Telemetry { tracer_provider, meter_provider, swap_latency_ms, invariant_growth_rel })
}

/// Só o subscriber de console, sem exportadores (testes e execução offline).
pub fn init_console() -> Result<()> {
    let subscriber = Registry::default()
        .with(filter_from_env())
        .with(tracing_subscriber::fmt::layer().with_target(false));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Cria um `Span` INFO com nome **estático** (exigência do tracing) e
/// coloca o nome dinâmico em `span_name`. Inclui `git_commit_sha`.
pub fn make_info_span(name: &str, op_id: u32, commit_sha: &str) -> tracing::Span {
    tracing::span!(
        target: "swap_engine_core",
        Level::INFO,
        "op",
        git_commit_sha = %commit_sha,
        span_name = %name,
        op_id = op_id
    )
}
