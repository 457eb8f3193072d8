//! Environment configuration loading from .env files
//!
//! Interpreter limits read from `.env` or the process environment.

use std::env;

use once_cell::sync::Lazy;

/// Default size of the instruction history ring
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

// Load .env the first time any setting is read
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    ensure_loaded();
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Step budget for a run (`PIET_MAX_STEPS`)
/// Default: unbounded. `0` also means unbounded.
pub fn max_steps() -> Option<u64> {
    parse_var::<u64>("PIET_MAX_STEPS").filter(|&n| n > 0)
}

/// Executed instructions kept for inspection (`PIET_HISTORY_LIMIT`)
/// Default: 1000
pub fn history_limit() -> usize {
    parse_var("PIET_HISTORY_LIMIT").unwrap_or(DEFAULT_HISTORY_LIMIT)
}
