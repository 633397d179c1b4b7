//! Typed configuration values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated configuration value.
///
/// Serialized untagged so the persisted aggregate stays close to the
/// original JSON shape (bools as bools, ids and minutes as numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Id(u64),
    IdList(Vec<u64>),
    Str(String),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Int(i) => write!(f, "{i}"),
            ConfigValue::Id(id) => write!(f, "{id}"),
            ConfigValue::IdList(ids) => {
                let joined: Vec<String> = ids.iter().map(u64::to_string).collect();
                write!(f, "{}", joined.join(","))
            }
            ConfigValue::Str(s) => write!(f, "{s}"),
        }
    }
}
