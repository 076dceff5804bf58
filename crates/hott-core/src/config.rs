//! Process configuration read from the environment.

use std::sync::OnceLock;

/// Setting this variable to `1` makes the evaluator panic on states that
/// well-typed input can never reach, instead of producing diagnostic neutrals.
pub const DEBUG_VAR: &str = "HOTTGO_DEBUG";

pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Panic on impossible evaluator states.
    pub debug: bool,
    /// Maximum number of entries in a per-operation evaluation cache.
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        let debug = std::env::var(DEBUG_VAR)
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        Config {
            debug,
            ..Config::default()
        }
    }

    /// The configuration of this process. The environment is consulted once.
    pub fn current() -> &'static Config {
        static CONFIG: OnceLock<Config> = OnceLock::new();
        CONFIG.get_or_init(|| {
            let config = Config::from_env();
            if config.debug {
                log::debug!("{DEBUG_VAR} set: evaluator panics on impossible states");
            }
            config
        })
    }

    pub fn with_debug(self, debug: bool) -> Config {
        Config { debug, ..self }
    }

    pub fn with_cache_capacity(self, cache_capacity: usize) -> Config {
        Config {
            cache_capacity,
            ..self
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Options for definitional equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvOptions {
    /// Compare functions and pairs up to η.
    pub eta: bool,
}

impl Default for ConvOptions {
    fn default() -> Self {
        ConvOptions { eta: true }
    }
}

impl ConvOptions {
    pub fn without_eta() -> ConvOptions {
        ConvOptions { eta: false }
    }
}
