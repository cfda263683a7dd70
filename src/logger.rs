use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

// Uses 'log' to allow for logging
// Logging is done by logging the level, target and the given arguments to stderr,
// stdout only carries evaluation results
struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let output = format!(
                "{} - {} - {}",
                record.level(),
                record.target(),
                record.args()
            );

            match record.level() {
                Level::Error => eprintln!("{}", output.red()),
                Level::Warn => eprintln!("{}", output.purple()),
                Level::Info => eprintln!("{}", output.blue()),
                _ => eprintln!("{}", output),
            }
        }
    }

    fn flush(&self) {}
}

// Initializes 'log' with the custom logger
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
static LOGGER: SimpleLogger = SimpleLogger;
