use log::{Level, LevelFilter, Log, Metadata, Record};
use web_sys::console;

/// Routes the `log` facade to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args()).into();
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

pub fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

pub fn init_logger(debug: bool) {
    match log::set_logger(&LOGGER) {
        Ok(()) => log::set_max_level(level_for(debug)),
        Err(e) => console::warn_1(&format!("Logger already installed: {e}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::level_for;
    use log::LevelFilter;

    #[test]
    fn debug_mode_lowers_the_threshold() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Info);
    }
}
