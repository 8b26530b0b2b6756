use chrono::Local;
use cogbot::config::Config;
use log::{Log, Metadata, Record, SetLoggerError};

/// Installs [`Logger`] as the global logger. Only records from this crate are
/// written, up to the level set in the config.
pub fn init(config: &Config) -> Result<(), SetLoggerError> {
    log::set_logger(&Logger)?;
    log::set_max_level(config.loglevel);
    Ok(())
}

/// Writes log records to stderr so stdout only carries command responses.
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with(env!("CARGO_CRATE_NAME"))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!(
            "{} {:<5} {}: {}",
            Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.module_path().unwrap_or_else(|| record.target()),
            record.args()
        );
    }

    fn flush(&self) {}
}
