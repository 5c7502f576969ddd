
use tracing::metadata::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::{self, time::OffsetTime}, prelude::*};
use time::macros::format_description;

/// Install the global subscriber. Call before the runtime spins up
/// worker threads, otherwise the local offset is indeterminate and the
/// timestamps fall back to UTC.
pub fn init() {

    // see https://time-rs.github.io/book/api/format-description.html
    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(offset, format_description!("[hour]:[minute]:[second].[subsecond digits:3]"));

    let layer = fmt::layer()
    .with_target(false)
    .with_timer(timer);

    let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

    tracing_subscriber::registry()
    .with(layer)
    .with(filter)
    .init();
}
