//! Logging subscriber initialisation.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::ObservabilityError;

/// Dependencies that are noisy below `warn`.
const QUIET_TARGETS: [&str; 6] = ["h2", "hyper", "sqlx", "reqwest", "tonic", "opentelemetry"];

type FmtLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

pub(super) fn init_subscriber(
    config: &ServerConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let otel_layer = tracer_provider.map(|provider| {
        let tracer = provider.tracer(config.observability.otel_service_name.clone());

        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(fmt_layer(config.logging.log_format))
        .with(env_filter(&config.logging.log_level))
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

fn fmt_layer(format: LogFormat) -> FmtLayer {
    match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
    }
}

/// `RUST_LOG` wins when it parses; otherwise the configured level applies.
fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_ignored| EnvFilter::new(directives(log_level)))
}

fn directives(log_level: &str) -> String {
    QUIET_TARGETS
        .iter()
        .fold(log_level.to_string(), |mut filter, target| {
            filter.push(',');
            filter.push_str(target);
            filter.push_str("=warn");
            filter
        })
}
