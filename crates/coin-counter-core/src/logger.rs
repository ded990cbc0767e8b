//! Stderr logger for the frame pipeline and its tools.
//!
//! Records from the coin counter crates pass at the configured level; records
//! from other crates (image decoders, clap) only at `warn` and above, so a
//! verbose run shows per-frame pipeline detail without decoder noise. Lines
//! look like `[  1.234s  INFO pipeline] frame 3: counted ...`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const CRATE_PREFIX: &str = "coin_counter";

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

impl FrameLogger {
    fn limit_for(&self, target: &str) -> LevelFilter {
        if target.starts_with(CRATE_PREFIX) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

/// Drop the crate prefix: `coin_counter::pipeline` -> `pipeline`,
/// `coin_counter_blobs::filter` -> `blobs::filter`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix("coin_counter::")
        .or_else(|| target.strip_prefix("coin_counter_"))
        .unwrap_or(target)
}

fn format_line(elapsed: f64, level: Level, target: &str, message: &std::fmt::Arguments) -> String {
    format!("[{:7.3}s {:>5} {}] {}", elapsed, level, short_target(target), message)
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.limit_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

/// Install the stderr logger; `level` applies to the coin counter crates.
///
/// Later calls are no-ops.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| FrameLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Span close events are emitted so per-stage timings show up in the output.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_span_events(FmtSpan::CLOSE);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(level: LevelFilter) -> FrameLogger {
        FrameLogger {
            level,
            started: Instant::now(),
        }
    }

    fn meta(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn dependency_records_are_capped_at_warn() {
        let log = logger(LevelFilter::Debug);
        assert!(log.enabled(&meta(Level::Debug, "coin_counter::pipeline")));
        assert!(log.enabled(&meta(Level::Debug, "coin_counter_blobs::filter")));
        assert!(!log.enabled(&meta(Level::Trace, "coin_counter::tracker")));
        assert!(!log.enabled(&meta(Level::Info, "png::decoder")));
        assert!(log.enabled(&meta(Level::Warn, "png::decoder")));

        let quiet = logger(LevelFilter::Error);
        assert!(!quiet.enabled(&meta(Level::Warn, "png::decoder")));
    }

    #[test]
    fn lines_carry_short_targets() {
        assert_eq!(short_target("coin_counter::pipeline"), "pipeline");
        assert_eq!(short_target("coin_counter_core::morphology"), "core::morphology");
        assert_eq!(short_target("coin_counter"), "coin_counter");
        assert_eq!(short_target("png::decoder"), "png::decoder");

        let line = format_line(1.5, Level::Info, "coin_counter::pipeline", &format_args!("frame {}", 3));
        assert_eq!(line, "[  1.500s  INFO pipeline] frame 3");
    }
}
