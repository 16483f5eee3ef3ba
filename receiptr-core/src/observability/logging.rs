use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes structured JSON logging for a service.
///
/// `RUST_LOG` wins over the configured default level. Safe to call once per
/// process; test binaries that spawn the application should call
/// [`try_init_tracing`] instead so repeated initialization is not fatal.
pub fn init_tracing(service_name: &str, log_level: &str) {
    try_init_tracing(service_name, log_level)
        .unwrap_or_else(|e| panic!("Failed to initialize tracing for {}: {}", service_name, e));
}

pub fn try_init_tracing(
    service_name: &str,
    log_level: &str,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init();

    if result.is_ok() {
        tracing::info!(service = %service_name, "Tracing initialized");
    }

    result
}
