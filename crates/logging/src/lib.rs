// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # atomselect's Logging Setup
//!
//! The selection crates only talk to the [`log`] facade.  Binaries and test suites that want to
//! see those records call [`init`] (or [`init_with_level`]) once, which installs [`env_logger`]
//! with a default filter covering the requested crates.
//!
//! By default, the logging level is set to [`Info`](log::Level::Info) for debug builds, and
//! [`Warn`](log::Level::Warn) for release builds. This can be overridden by setting the `RUST_LOG`
//! environment variable, like so:
//!
//! ```sh
//! $> RUST_LOG=atomselect=debug cargo test
//! ```

/// The crates whose records are shown when no explicit list is given.
pub const DEFAULT_CRATES: &[&str] = &["atomselect", "atomselect_molecule"];

/// Initializes logging for [`DEFAULT_CRATES`] at the build-profile default level.
pub fn init() {
    init_with_level(DEFAULT_CRATES, default_level());
}

/// [`Info`](log::LevelFilter::Info) in debug builds, [`Warn`](log::LevelFilter::Warn) otherwise.
pub fn default_level() -> log::LevelFilter {
    if cfg!(debug_assertions) {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    }
}

/// Builds the filter string that would have been set in `RUST_LOG`, e.g.
/// `"atomselect=debug,atomselect_molecule=debug"`.
pub fn filter_string(crates: &[&str], log_level: log::LevelFilter) -> String {
    let level_str = match log_level {
        log::LevelFilter::Off => "off",
        log::LevelFilter::Error => "error",
        log::LevelFilter::Warn => "warn",
        log::LevelFilter::Info => "info",
        log::LevelFilter::Debug => "debug",
        log::LevelFilter::Trace => "trace",
    };
    crates
        .iter()
        .map(|pkg_name| format!("{}={}", pkg_name, level_str))
        .collect::<Vec<_>>()
        .join(",")
}

fn builder(crates: &[&str], log_level: log::LevelFilter) -> env_logger::Builder {
    // RUST_LOG, when present, wins over the computed default.
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(filter_string(crates, log_level)),
    )
}

/// Installs the global logger.  Panics if a logger is already installed, like
/// [`env_logger::init`].
pub fn init_with_level(crates: &[&str], log_level: log::LevelFilter) {
    builder(crates, log_level).init();
}

/// Test-harness variant: output goes through the test capture and repeated calls from several
/// tests in one binary are harmless.
pub fn try_init_for_tests() {
    let _ = builder(DEFAULT_CRATES, log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}


// End of File
