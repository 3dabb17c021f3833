use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

/// Compact logger without timestamps.
///
/// Verbosity comes from `--log`, then `HERO_CROPPER_LOG`, defaulting to
/// `warn`. Example: `HERO_CROPPER_LOG=hero_cropper=debug cargo run`
pub fn init(filter_override: Option<&str>) {
    let level = filter_override
        .map(str::to_owned)
        .or_else(|| std::env::var("HERO_CROPPER_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());

    let filter = EnvFilter::try_new(&level).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?}: {}", level, e);
        EnvFilter::new("warn")
    });

    let subscriber = tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .without_time()
            .with_level(true)
            .with_target(true)
            .with_filter(filter),
    );
    if subscriber.try_init().is_err() {
        eprintln!("Logger already initialized");
    }
}
