//! Logger setup.
//!
//! Everything logs through the `log` facade; the binary installs `env_logger`
//! here. `RUST_LOG` overrides the default `info` filter.

use std::io::Write;

/// Installs the global logger. Safe to call more than once (later calls are no-ops).
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}
