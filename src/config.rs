//! Engine configuration with environment overrides.

use std::str::FromStr;

use crate::errors::ConfigError;
use crate::search::iterative_deepening::SearchConfig;
use crate::search::zobrist::DEFAULT_ZOBRIST_SEED;

pub const ENV_TT_MB: &str = "POLY_CHESS_TT_MB";
pub const ENV_DEPTH: &str = "POLY_CHESS_DEPTH";
pub const ENV_SEED: &str = "POLY_CHESS_SEED";
pub const ENV_VERIFY_HASH: &str = "POLY_CHESS_VERIFY_HASH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub tt_size_mb: usize,
    pub max_depth: u8,
    pub zobrist_seed: u64,
    pub verify_hash: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tt_size_mb: 16,
            max_depth: 4,
            zobrist_seed: DEFAULT_ZOBRIST_SEED,
            verify_hash: false,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `POLY_CHESS_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            tt_size_mb: read(&lookup, ENV_TT_MB, defaults.tt_size_mb)?,
            max_depth: read(&lookup, ENV_DEPTH, defaults.max_depth)?,
            zobrist_seed: read(&lookup, ENV_SEED, defaults.zobrist_seed)?,
            verify_hash: read_flag(&lookup, ENV_VERIFY_HASH, defaults.verify_hash)?,
        })
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            verify_hash: self.verify_hash,
        }
    }
}

fn read<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

fn read_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}
