//! Консольный логгер / Console logger
//!
//! Все записи `log` идут в stderr через общий замок, чтобы строки из
//! разных потоков не перемешивались.
//! Every `log` record goes to stderr through one lock so lines from
//! different threads never interleave.
//!
//! Уровень / Level: переменная окружения `OSSIM_LOG` (по умолчанию `info`).

use core::fmt;
use core::str::FromStr;
use std::io::Write as _;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

pub const LOG_ENV: &str = "OSSIM_LOG";

struct ConsoleWriter;

impl fmt::Write for ConsoleWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        std::io::stderr().write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

static CONSOLE_LOCK: Mutex<ConsoleWriter> = Mutex::new(ConsoleWriter);

/// Внутренняя функция для логгера / Internal print used by the logger
pub fn _print(args: fmt::Arguments) {
    use fmt::Write;
    CONSOLE_LOCK.lock().write_fmt(args).ok();
}

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            _print(format_args!("{:5} {}\n", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

/// Разобрать уровень; мусор и пустота дают `info`.
/// Parse a level; garbage or nothing yields `info`.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
