//! Committed-configuration access for the tailscale subtree.
//!
//! VyOS renders a configuration subtree as indented text, one node per
//! line, with single-character markers in front of lines that differ from
//! the running state. The parser flattens that rendering into a
//! [`ConfigMap`].
//!
//! # Input shape
//!
//! ```text
//!  auth-key tskey-auth-xxxxx
//!  advertise {
//!      exit-node
//!      route 10.0.0.0/24
//!      route 192.168.0.0/16
//!  }
//!  hostname gateway
//! ```
//!
//! Children of the `advertise` block share a namespace with their
//! siblings: the block exists for operator ergonomics in the router CLI,
//! not for scoping.

pub mod query;

pub use query::{fetch_config, QueryError};

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Rendered by `cli-shell-api` when the queried path does not exist in the
/// committed configuration. Seeing it anywhere in either output stream
/// means "not configured", never "query failed".
pub const INVALID_PATH_MARKER: &str = "Specified configuration path is not valid";

/// A single configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Key present with no value (`ssh`, `exit-node`).
    Flag,
    /// Key with exactly one value.
    Scalar(String),
    /// Key repeated across lines; values in the order they appeared.
    List(Vec<String>),
}

impl ConfigValue {
    /// All values carried by this entry, in encounter order. A presence
    /// flag carries none.
    pub fn values(&self) -> &[String] {
        match self {
            ConfigValue::Flag => &[],
            ConfigValue::Scalar(value) => std::slice::from_ref(value),
            ConfigValue::List(values) => values,
        }
    }

    /// Joins all carried values with `sep`. For a `Scalar` this is the
    /// value itself; for a `Flag` the empty string.
    pub fn join(&self, sep: &str) -> String {
        self.values().join(sep)
    }

    /// Folds a later occurrence of the same key into this entry. A
    /// valueless repeat leaves the entry unchanged, so lists never mix
    /// presence and value.
    fn absorb(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        match self {
            ConfigValue::Flag => *self = ConfigValue::Scalar(value.to_string()),
            ConfigValue::Scalar(first) => {
                *self = ConfigValue::List(vec![std::mem::take(first), value.to_string()]);
            }
            ConfigValue::List(values) => values.push(value.to_string()),
        }
    }
}

/// Flat view of the tailscale subtree: block nesting is erased, duplicate
/// keys are folded into lists.
pub type ConfigMap = HashMap<String, ConfigValue>;

/// Parses `showCfg` output into a [`ConfigMap`].
///
/// Never fails: an empty or sentinel-bearing input yields an empty map,
/// which callers treat as "nothing configured". Failures to *obtain* the
/// text are the query layer's concern.
pub fn parse(raw: &str) -> ConfigMap {
    let mut config = ConfigMap::new();

    if raw.contains(INVALID_PATH_MARKER) {
        return config;
    }

    for line in raw.lines() {
        let clean = line.trim_start_matches([' ', '+', '-', '>']).trim();
        if clean.is_empty() {
            continue;
        }

        // Exactly one block exists in this subtree. Its marker lines are
        // namespace-transparent: children are stored like siblings.
        if clean == "advertise {" || clean == "}" {
            continue;
        }

        let (key, value) = match clean.split_once(char::is_whitespace) {
            Some((key, rest)) => (key, Some(rest.trim_start())),
            None => (clean, None),
        };

        match config.entry(key.to_string()) {
            Entry::Occupied(mut entry) => entry.get_mut().absorb(value),
            Entry::Vacant(slot) => {
                slot.insert(match value {
                    Some(value) => ConfigValue::Scalar(value.to_string()),
                    None => ConfigValue::Flag,
                });
            }
        }
    }

    config
}
