//! Structured logging setup
//!
//! The library itself only emits `tracing` events (`Route tree built`,
//! `Route matched`, `Slow route matching detected`, ...). Binaries install a
//! subscriber with [`init_logging_with_config`]:
//!
//! - JSON output for machines, pretty output for people
//! - `EnvFilter` level and per-target directives
//! - sampling of chatty `DEBUG`/`INFO` events, `WARN`/`ERROR` always pass
//! - optional non-blocking writer so lookups never wait on stderr
//!
//! ## Environment Variables
//!
//! | Variable | Default | Values |
//! |----------|---------|--------|
//! | `ROUTETREE_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `ROUTETREE_LOG_FORMAT` | `pretty` | json/pretty |
//! | `ROUTETREE_LOG_SAMPLING_MODE` | `all` | all/error-only/sampled |
//! | `ROUTETREE_LOG_SAMPLING_RATE` | `0.1` | 0.0-1.0 |
//! | `ROUTETREE_LOG_ASYNC` | `false` | true/false |
//! | `ROUTETREE_LOG_TARGET_FILTER` | unset | comma-separated directives |
//!
//! `RUST_LOG`, when set, takes precedence over `ROUTETREE_LOG_LEVEL`.

use anyhow::{Context, Result};
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::Level;
use tracing::subscriber::Interest;
use tracing::{Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for pipelines, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Sampling mode: how to decide which events to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// Emit everything
    All,
    /// Emit only WARN and ERROR
    ErrorOnly,
    /// Emit every Nth lower-level event, all WARN and ERROR
    Sampled,
}

impl SamplingMode {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error-only" | "error_only" => SamplingMode::ErrorOnly,
            "sampled" => SamplingMode::Sampled,
            _ => SamplingMode::All,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub sampling_mode: SamplingMode,
    /// Fraction of sub-WARN events kept in `Sampled` mode
    pub sampling_rate: f64,
    /// Write through a background thread
    pub async_logging: bool,
    /// Extra `EnvFilter` directives, comma-separated
    pub target_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            sampling_mode: SamplingMode::All,
            sampling_rate: 0.1,
            async_logging: false,
            target_filter: None,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env::var("ROUTETREE_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("ROUTETREE_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            sampling_mode: env::var("ROUTETREE_LOG_SAMPLING_MODE")
                .map(|s| SamplingMode::parse(&s))
                .unwrap_or(defaults.sampling_mode),
            sampling_rate: env::var("ROUTETREE_LOG_SAMPLING_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sampling_rate),
            async_logging: env::var("ROUTETREE_LOG_ASYNC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.async_logging),
            target_filter: env::var("ROUTETREE_LOG_TARGET_FILTER").ok(),
        }
    }

    /// Verbose configuration for local debugging
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            sampling_rate: 1.0,
            ..Self::default()
        }
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Sampling layer: decides whether to emit an event based on sampling rules
pub struct SamplingLayer {
    mode: SamplingMode,
    sampling_rate: f64,
    counter: AtomicU64,
}

impl SamplingLayer {
    pub fn new(mode: SamplingMode, sampling_rate: f64) -> Self {
        Self {
            mode,
            sampling_rate: sampling_rate.clamp(0.0, 1.0),
            counter: AtomicU64::new(0),
        }
    }

    fn should_sample(&self, metadata: &Metadata<'_>) -> bool {
        let severe = matches!(*metadata.level(), Level::WARN | Level::ERROR);
        match self.mode {
            SamplingMode::All => true,
            SamplingMode::ErrorOnly => severe,
            SamplingMode::Sampled => {
                if severe {
                    return true;
                }
                if self.sampling_rate <= 0.0 {
                    return false;
                }
                let count = self.counter.fetch_add(1, Ordering::Relaxed);
                let interval = (1.0 / self.sampling_rate) as u64;
                interval > 0 && count % interval == 0
            }
        }
    }
}

impl<S> Layer<S> for SamplingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if !metadata.is_event() {
            return Interest::always();
        }
        match self.mode {
            // the counter has to see every event, so the answer cannot be cached
            SamplingMode::Sampled if !matches!(*metadata.level(), Level::WARN | Level::ERROR) => {
                Interest::sometimes()
            }
            _ if self.should_sample(metadata) => Interest::always(),
            _ => Interest::never(),
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: LayerContext<'_, S>) -> bool {
        // spans carry no output of their own and must stay open for events
        !metadata.is_event() || self.should_sample(metadata)
    }
}

/// Keeps the background writer alive; drop it on shutdown to flush.
#[must_use = "dropping the guard stops the background log writer"]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use routetree::logging::{init_logging_with_config, LogConfig};
///
/// let _guard = init_logging_with_config(&LogConfig::from_env())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<LogGuard> {
    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',') {
            let filter = filter.trim();
            if filter.is_empty() {
                continue;
            }
            match filter.parse() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
            }
        }
    }

    let (writer, worker) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(SamplingLayer::new(config.sampling_mode, config.sampling_rate))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(LogGuard { _worker: worker })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(level: Level) -> Metadata<'static> {
        Metadata::new(
            "test",
            "routetree::test",
            level,
            None,
            None,
            None,
            tracing::field::FieldSet::new(&[], tracing::callsite::Identifier(&CALLSITE)),
            tracing::metadata::Kind::EVENT,
        )
    }

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.sampling_mode, SamplingMode::All);
        assert!(!config.async_logging);
        assert!(config.target_filter.is_none());
    }

    #[test]
    fn test_log_config_default_dev() {
        let config = LogConfig::default_dev();
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.sampling_rate, 1.0);
    }

    #[test]
    fn test_level_parse() {
        let mut config = LogConfig::default();
        config.log_level = "WARN".to_string();
        assert_eq!(config.level(), Level::WARN);
        config.log_level = "bogus".to_string();
        assert_eq!(config.level(), Level::INFO);
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Pretty);
    }

    #[test]
    fn test_sampling_mode_parse() {
        assert_eq!(SamplingMode::parse("all"), SamplingMode::All);
        assert_eq!(SamplingMode::parse("error-only"), SamplingMode::ErrorOnly);
        assert_eq!(SamplingMode::parse("error_only"), SamplingMode::ErrorOnly);
        assert_eq!(SamplingMode::parse("sampled"), SamplingMode::Sampled);
        assert_eq!(SamplingMode::parse("invalid"), SamplingMode::All);
    }

    #[test]
    fn test_sampling_layer_error_only_mode() {
        let layer = SamplingLayer::new(SamplingMode::ErrorOnly, 1.0);
        assert!(!layer.should_sample(&metadata(Level::INFO)));
        assert!(!layer.should_sample(&metadata(Level::DEBUG)));
        assert!(layer.should_sample(&metadata(Level::WARN)));
        assert!(layer.should_sample(&metadata(Level::ERROR)));
    }

    #[test]
    fn test_sampling_layer_sampled_mode_always_logs_warnings() {
        let layer = SamplingLayer::new(SamplingMode::Sampled, 0.0);
        for _ in 0..100 {
            assert!(layer.should_sample(&metadata(Level::WARN)));
            assert!(!layer.should_sample(&metadata(Level::DEBUG)));
        }
    }

    #[test]
    fn test_sampling_layer_sampled_mode_respects_rate() {
        let layer = SamplingLayer::new(SamplingMode::Sampled, 0.5);
        let sampled = (0..100)
            .filter(|_| layer.should_sample(&metadata(Level::INFO)))
            .count();
        assert_eq!(sampled, 50);
    }

    #[test]
    fn test_sampling_rate_clamping() {
        assert_eq!(SamplingLayer::new(SamplingMode::Sampled, -0.5).sampling_rate, 0.0);
        assert_eq!(SamplingLayer::new(SamplingMode::Sampled, 1.5).sampling_rate, 1.0);
    }

    #[derive(Default)]
    struct CountByTarget {
        seen: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, usize>>>,
    }

    impl<S: Subscriber> Layer<S> for CountByTarget {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
            if let Ok(mut seen) = self.seen.lock() {
                *seen.entry(event.metadata().target().to_string()).or_default() += 1;
            }
        }
    }

    #[test]
    fn test_sampled_mode_samples_each_callsite_per_event() {
        let counter = CountByTarget::default();
        let seen = std::sync::Arc::clone(&counter.seen);
        let subscriber = tracing_subscriber::registry()
            .with(SamplingLayer::new(SamplingMode::Sampled, 0.5))
            .with(counter);

        tracing::subscriber::with_default(subscriber, || {
            for i in 0..100 {
                tracing::info!(target: "sampling_first", i, "first callsite");
            }
            for i in 0..100 {
                tracing::info!(target: "sampling_second", i, "second callsite");
            }
            tracing::warn!(target: "sampling_warn", "always kept");
        });

        let seen = seen.lock().unwrap();
        let first = seen.get("sampling_first").copied().unwrap_or(0);
        let second = seen.get("sampling_second").copied().unwrap_or(0);
        assert!((25..=75).contains(&first), "first callsite kept {first} of 100");
        assert!((25..=75).contains(&second), "second callsite kept {second} of 100");
        assert_eq!(seen.get("sampling_warn").copied(), Some(1));
    }

    #[test]
    fn test_log_config_from_env() {
        std::env::set_var("ROUTETREE_LOG_FORMAT", "json");
        std::env::set_var("ROUTETREE_LOG_SAMPLING_MODE", "sampled");
        std::env::set_var("ROUTETREE_LOG_SAMPLING_RATE", "0.25");
        std::env::set_var("ROUTETREE_LOG_TARGET_FILTER", "routetree=trace");

        let config = LogConfig::from_env();

        std::env::remove_var("ROUTETREE_LOG_FORMAT");
        std::env::remove_var("ROUTETREE_LOG_SAMPLING_MODE");
        std::env::remove_var("ROUTETREE_LOG_SAMPLING_RATE");
        std::env::remove_var("ROUTETREE_LOG_TARGET_FILTER");

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.sampling_mode, SamplingMode::Sampled);
        assert_eq!(config.sampling_rate, 0.25);
        assert_eq!(config.target_filter.as_deref(), Some("routetree=trace"));
    }

    struct TestCallsite;
    impl tracing::callsite::Callsite for TestCallsite {
        fn set_interest(&self, _interest: tracing::subscriber::Interest) {}
        fn metadata(&self) -> &tracing::Metadata<'_> {
            panic!("not used in tests")
        }
    }
    static CALLSITE: TestCallsite = TestCallsite;
}
