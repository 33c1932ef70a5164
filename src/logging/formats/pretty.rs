use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::Layer as LayerTrait,
    registry::LookupSpan,
};

use crate::logging::config::LoggingConfig;

/// Human-oriented multi-line output, meant for local development.
pub fn build_pretty_layer<S, W>(
    _config: &LoggingConfig,
    writer: W,
    with_ansi: bool,
) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .pretty()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(writer)
        .with_ansi(with_ansi)
        .with_target(true)
        .with_thread_names(true)
        .with_line_number(true);

    Box::new(layer)
}
