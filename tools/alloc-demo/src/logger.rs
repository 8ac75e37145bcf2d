use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Environment variable holding the maximum log level, e.g. `debug`.
pub const LEVEL_VAR: &str = "ALLOC_DEMO_LOG";

pub struct StderrLogger {
    max_level: LevelFilter,
}

impl StderrLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    /// Reads the level from [`LEVEL_VAR`], falling back to `info` when the
    /// variable is unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let level = std::env::var(LEVEL_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(LevelFilter::Info);
        Self::new(level)
    }

    /// Call this once at startup.
    ///
    /// # Errors
    /// Fails if another logger was installed first.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Format: "[LEVEL] target: message\n"
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
