use asset_tracker_config::{Setting, Telemetry};
use asset_tracker_valuation::{ClientServiceConfig, ExchangeRegistry, PriceResolver, Valuator};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{self, RandomIdGenerator},
    Resource,
};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

pub fn init_tracing_subscriber(telemetry: &Telemetry) -> anyhow::Result<OtelGuard> {
    let console = fmt::Layer::new()
        .with_span_events(FmtSpan::CLOSE)
        .pretty()
        .with_filter(LevelFilter::DEBUG);

    // file appender layer for tracing-subscriber
    let file_appender = tracing_appender::rolling::daily(
        &telemetry.log_dir,
        format!("{}.log", telemetry.service_name),
    );
    let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
    let file = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    // opentelemetry tracing layer, 未配置 endpoint 时不启用
    let opentelemetry = match &telemetry.otlp_endpoint {
        Some(endpoint) => {
            let tracer = opentelemetry_otlp::new_pipeline()
                .tracing()
                .with_exporter(
                    opentelemetry_otlp::new_exporter()
                        .tonic()
                        .with_endpoint(endpoint),
                )
                .with_trace_config(
                    trace::config()
                        .with_id_generator(RandomIdGenerator::default())
                        .with_max_events_per_span(32)
                        .with_max_attributes_per_span(64)
                        .with_resource(Resource::new(vec![KeyValue::new(
                            "service.name",
                            telemetry.service_name.clone(),
                        )])),
                )
                .install_batch(runtime::Tokio)?;

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .with(opentelemetry)
        .init();

    Ok(OtelGuard {
        _worker_guard: worker_guard,
    })
}

pub struct OtelGuard {
    _worker_guard: WorkerGuard,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

// 按配置组装估值器
pub fn build_valuator(setting: &Setting) -> Valuator<ExchangeRegistry> {
    let resolver = PriceResolver::builder()
        .currency(setting.valuation.currency.clone())
        .bridge_assets(setting.valuation.bridge_assets.clone())
        .build();

    let client_config = ClientServiceConfig::builder()
        .timeout_secs(setting.client.timeout_secs)
        .retry_max_retries(setting.client.retry_max_retries)
        .retry_wait_secs(setting.client.retry_wait_secs)
        .build();

    Valuator::builder()
        .factory(ExchangeRegistry::default())
        .resolver(resolver)
        .client_config(client_config)
        .build()
}
