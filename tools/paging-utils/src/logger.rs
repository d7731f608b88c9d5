use env_logger::{Builder, Target};
use log::{LevelFilter, SetLoggerError};
use std::io::Write;

/// Map a `-v` count onto a level, starting from `Warn`.
#[must_use]
pub const fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logger writing `[LEVEL] target: message` lines to stderr.
///
/// Standard output is reserved for conversion results. `RUST_LOG` is not
/// consulted; the level comes from the command line only.
#[must_use]
pub fn builder(max_level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(max_level)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        });
    builder
}

/// Install the stderr logger for `verbose` as the global logger.
///
/// # Errors
/// Fails if another logger was installed first.
pub fn init(verbose: u8) -> Result<(), SetLoggerError> {
    builder(level_for_verbosity(verbose)).try_init()
}
