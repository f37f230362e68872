use env_logger::Env;

/// Timestamped logs to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();
}
