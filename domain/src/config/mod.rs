//! Council configuration schema.
//!
//! Councils carry a map of named, typed, range-validated settings. The
//! original system inferred a value's type from its string shape at write
//! time; here every recognized key has an explicit [`ConfigKind`], and
//! out-of-range or unknown values are rejected rather than coerced.

pub mod key;
pub mod value;

pub use key::{
    ConfigKeyInfo, ConfigKind, DEPRECATED_KEYS, known_keys, lookup_key, validate_config,
};
pub use value::ConfigValue;
