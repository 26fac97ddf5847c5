//! Run configuration.  Built once at startup from the environment and
//! the command line, then passed by reference into the planner and the
//! dispatcher.  Nothing past `main` looks at the process environment.

use errors::{MandelError, Result};
use planner::CpuCount;
use std::str::FromStr;

/// Environment variable that turns on diagnostics.
pub const DEBUG_VAR: &str = "MANDELDEBUG";

/// Environment variable that overrides the detected processor count.
/// The count reported by the OS can be wrong inside a container.
pub const CPUS_VAR: &str = "MAX_CPUS";

/// Default ceiling on the size of a single row buffer: 1 GiB.
pub const DEFAULT_MAX_ROW_BYTES: usize = 1 << 30;

/// Everything that can be tuned about a run.  None of it changes the
/// rendered image.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Emit diagnostics about the plan on stderr.
    pub debug: bool,
    /// Use this processor count instead of asking the OS.
    pub cpus: Option<usize>,
    /// Largest row buffer, in bytes, a worker may allocate.
    pub max_row_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: false,
            cpus: None,
            max_row_bytes: DEFAULT_MAX_ROW_BYTES,
        }
    }
}

/// Only the exact strings "true" and "TRUE" turn diagnostics on.
fn is_truthy(value: &str) -> bool {
    value == "true" || value == "TRUE"
}

/// Parse a numeric setting, naming its source if it isn't one.
pub fn parse_setting<T: FromStr>(name: &str, value: &str) -> Result<T> {
    T::from_str(value.trim()).map_err(|_| {
        MandelError::Config(format!(
            "{} must be a non-negative integer, got {:?}",
            name, value
        ))
    })
}

impl Config {
    /// Build a configuration from environment variables, looked up
    /// through `lookup` so that callers (and tests) control the source.
    pub fn from_env<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(debug) = lookup(DEBUG_VAR) {
            config.debug = is_truthy(&debug);
        }
        if let Some(cpus) = lookup(CPUS_VAR) {
            config.cpus = Some(parse_setting(CPUS_VAR, &cpus)?);
        }
        Ok(config)
    }

    /// The processor count to plan for: the override if there is one,
    /// `detected` otherwise.
    pub fn cpu_count(&self, detected: usize) -> Result<CpuCount> {
        CpuCount::new(self.cpus.unwrap_or(detected))
    }
}
