//! Console and log file output, plus the end-of-run summary.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, Tally, TaskEntry, TaskStatus};

/// Build a subscriber that writes every event to a [`FileLayer`] at `path`
/// and install it for the current thread.
///
/// Returns the guard that keeps the thread-local dispatcher installed.
///
/// [`FileLayer`]: subscriber::FileLayer
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn capture_to_file(path: &std::path::Path) -> tracing::dispatcher::DefaultGuard {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let file_layer = subscriber::FileLayer::at(path).expect("failed to create file layer");
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber))
}
