//! Console and log-file output built on `tracing`.
//!
//! [`Logger`] is the facade commands and the builder talk to, through the
//! [`Log`] trait. [`init_subscriber`] wires the console formatter and the
//! per-command log file once at startup.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, PairStatus, SummaryEntry};

/// Serializes `XDG_CACHE_HOME` changes across test threads.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// A [`Logger`] whose log file lives in a fresh temporary cache directory,
/// with a thread-local subscriber carrying only the file layer.
///
/// Keep all three values alive for the test; dropping the guard restores the
/// previous dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let cache = tempfile::tempdir().expect("temp cache dir");
    let (file_layer, log) = {
        let _lock = TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: Protected by TEST_ENV_MUTEX; removed again before the lock drops.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", cache.path());
        }
        let opened = (subscriber::FileLayer::new("test"), Logger::new("test"));
        #[allow(unsafe_code)]
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        opened
    };

    let file_layer = file_layer.expect("log file in temp cache dir");
    let dispatch = tracing::Dispatch::new(
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG)),
    );
    let guard = tracing::dispatcher::set_default(&dispatch);
    (log, cache, guard)
}
