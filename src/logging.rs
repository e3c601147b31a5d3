use std::{
    fmt,
    fs::OpenOptions,
    io::Write,
    sync::{Mutex, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

const LOG_PATH: &str = "gallery.log";

static LOG_FILE: OnceLock<Mutex<Option<std::fs::File>>> = OnceLock::new();

fn with_log_file(mut f: impl FnMut(&mut std::fs::File)) {
    let mutex = LOG_FILE.get_or_init(|| Mutex::new(None));
    let Ok(mut guard) = mutex.lock() else {
        return;
    };

    if guard.is_none() {
        *guard = OpenOptions::new()
            .create(true)
            .append(true)
            .open(LOG_PATH)
            .ok();
    }

    if let Some(file) = guard.as_mut() {
        f(file);
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

pub fn log_fmt(level: &str, args: fmt::Arguments) {
    let stamp = unix_millis();
    with_log_file(|file| {
        let _ = write!(file, "{stamp} [{level}] ");
        let _ = file.write_fmt(args);
        let _ = file.write_all(b"\n");
        let _ = file.flush();
    });
}

/// Like `println!`, but writes to `gallery.log` in the current working directory.
#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        {
            $crate::logging::log_fmt("info", format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        {
            $crate::logging::log_fmt("warn", format_args!($($arg)*))
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        {
            $crate::logging::log_fmt("error", format_args!($($arg)*))
        }
    };
}
