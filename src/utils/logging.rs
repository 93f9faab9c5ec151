//! Logging setup for the CLI and for hosts that link the C library

fn builder() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {:5} {}] {}",
                buf.timestamp(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        });
    builder
}

/// Initialize the logger with default settings.
/// Uses INFO level by default; the RUST_LOG environment variable can override it.
pub fn init_logger() {
    builder().init();
}

/// Like `init_logger`, but does nothing if a logger is already installed
pub fn try_init_logger() {
    if builder().try_init().is_err() {
        log::debug!("logger already initialized");
    }
}
