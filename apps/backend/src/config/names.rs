//! Process-wide AI display-name pool.
//!
//! Loaded once at first use from the file named by `MOLE_NAMES_FILE`
//! (default `resources/molenames.txt`), one name per line. A missing or
//! unreadable file degrades to an empty pool; AI-fill then cannot satisfy
//! capacity and `start()` fails with "too few players".

use std::env;
use std::fs;

use once_cell::sync::Lazy;
use tracing::{info, warn};

const DEFAULT_NAMES_FILE: &str = "resources/molenames.txt";

pub static NAME_POOL: Lazy<Vec<String>> = Lazy::new(|| {
    let path = env::var("MOLE_NAMES_FILE").unwrap_or_else(|_| DEFAULT_NAMES_FILE.to_string());
    load_name_pool(&path)
});

/// Read a name pool from `path`: one name per line, trimmed, blanks skipped.
pub fn load_name_pool(path: &str) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let names: Vec<String> = contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            info!(path, count = names.len(), "loaded AI name pool");
            names
        }
        Err(err) => {
            warn!(path, error = %err, "name pool unavailable, AI-fill disabled");
            Vec::new()
        }
    }
}
