//! Logger installation for the command-line adapter.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs `env_logger`, honouring `RUST_LOG` when it is set.
///
/// Without `RUST_LOG` the filter defaults to `info`, or `debug` when
/// `verbose` is requested. A logger installed earlier is left in place.
pub(crate) fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let env = Env::default().default_filter_or(level.to_string());
    let _ = Builder::from_env(env).format_timestamp_millis().try_init();
}
