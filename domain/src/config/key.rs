//! Config key registry and write-time validation.
//!
//! Defines metadata for every recognized configuration key: name,
//! description, and expected value kind. [`validate_config`] is the single
//! gate all config writes go through — unknown keys, deprecated keys, and
//! out-of-range values are rejected, never silently coerced.

use crate::config::value::ConfigValue;
use crate::core::error::DomainError;
use crate::motion::parse_majority;

/// Expected shape of a config value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Bool,
    /// Minutes before a motion auto-expires: 0 (never) or 1..=10080.
    ExpirationMinutes,
    /// Majority syntax: fraction, percent, or decimal.
    Majority,
    /// A single role or channel id.
    Id,
    /// Comma-separated role ids.
    IdList,
}

/// Metadata for a single config key.
#[derive(Debug, Clone)]
pub struct ConfigKeyInfo {
    /// Dotted key path (e.g. `"motion.expiration.minutes"`).
    pub key: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Expected value kind, enforced on write.
    pub kind: ConfigKind,
}

/// All recognized config keys with their metadata.
pub fn known_keys() -> &'static [ConfigKeyInfo] {
    &KNOWN_KEYS
}

/// Look up a config key by its dotted path.
pub fn lookup_key(key: &str) -> Option<&'static ConfigKeyInfo> {
    KNOWN_KEYS.iter().find(|k| k.key == key)
}

/// Keys that were superseded and are stripped from persisted state.
pub const DEPRECATED_KEYS: &[(&str, &str)] = &[(
    "motion.expiration.hours",
    "use `motion.expiration.minutes` instead",
)];

static KNOWN_KEYS: [ConfigKeyInfo; 13] = [
    ConfigKeyInfo {
        key: "motion.expiration.minutes",
        description: "Minutes before a motion auto-expires (0 disables expiration)",
        kind: ConfigKind::ExpirationMinutes,
    },
    ConfigKeyInfo {
        key: "majority.default",
        description: "Default majority for new motions (e.g. 1/2, 2/3, 60%)",
        kind: ConfigKind::Majority,
    },
    ConfigKeyInfo {
        key: "majority.reached.ends",
        description: "End a motion early once the majority is mathematically reached",
        kind: ConfigKind::Bool,
    },
    ConfigKeyInfo {
        key: "councilor.motion.disable",
        description: "Only admins may create motions",
        kind: ConfigKind::Bool,
    },
    ConfigKeyInfo {
        key: "propose.role",
        description: "Role required to propose motions",
        kind: ConfigKind::Id,
    },
    ConfigKeyInfo {
        key: "motion.queue",
        description: "Allow motions to queue behind the active one",
        kind: ConfigKind::Bool,
    },
    ConfigKeyInfo {
        key: "councilor.role",
        description: "Role required to vote",
        kind: ConfigKind::Id,
    },
    ConfigKeyInfo {
        key: "reason.required.yes",
        description: "Require a reason when voting yes",
        kind: ConfigKind::Bool,
    },
    ConfigKeyInfo {
        key: "reason.required.no",
        description: "Require a reason when voting no",
        kind: ConfigKind::Bool,
    },
    ConfigKeyInfo {
        key: "reason.required.abstain",
        description: "Require a reason when abstaining",
        kind: ConfigKind::Bool,
    },
    ConfigKeyInfo {
        key: "announcement.channel",
        description: "Channel where motion results are announced",
        kind: ConfigKind::Id,
    },
    ConfigKeyInfo {
        key: "announcement.ping.roles",
        description: "Comma-separated role ids pinged in the announcement channel",
        kind: ConfigKind::IdList,
    },
    ConfigKeyInfo {
        key: "keep.transcripts",
        description: "Keep the deliberation thread and attach a JSON transcript",
        kind: ConfigKind::Bool,
    },
];

/// Validate a raw string value against a key's registered kind.
///
/// Returns the typed [`ConfigValue`] to store, or a validation error. Role
/// and channel mentions in the `<@&id>` / `<#id>` host syntax are accepted
/// for id-kinded keys.
pub fn validate_config(key: &str, raw: &str) -> Result<ConfigValue, DomainError> {
    if let Some((dep, hint)) = DEPRECATED_KEYS.iter().find(|(k, _)| *k == key) {
        return Err(DomainError::DeprecatedConfigKey(dep.to_string(), hint));
    }
    let Some(info) = lookup_key(key) else {
        return Err(DomainError::UnknownConfigKey(key.to_string()));
    };

    let raw = raw.trim();
    let invalid = |reason: &str| DomainError::InvalidConfigValue {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    match info.kind {
        ConfigKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(ConfigValue::Bool(true)),
            "false" => Ok(ConfigValue::Bool(false)),
            _ => Err(invalid("expected true or false")),
        },
        ConfigKind::ExpirationMinutes => {
            let minutes: i64 = raw
                .parse()
                .map_err(|_| invalid("expected an integer number of minutes"))?;
            if minutes == 0 || (1..=10080).contains(&minutes) {
                Ok(ConfigValue::Int(minutes))
            } else {
                Err(invalid("must be 0 (never) or between 1 and 10080"))
            }
        }
        ConfigKind::Majority => {
            if raw.is_empty() {
                Err(invalid("expected a majority like 1/2, 2/3, or 60%"))
            } else {
                // Parse errors are not fatal here: a malformed majority is
                // defined to read as 0.5 for the motion's whole lifetime.
                let _ = parse_majority(raw);
                Ok(ConfigValue::Str(raw.to_string()))
            }
        }
        ConfigKind::Id => parse_id(raw)
            .map(ConfigValue::Id)
            .ok_or_else(|| invalid("expected a numeric id")),
        ConfigKind::IdList => {
            let mut ids = Vec::new();
            for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                match parse_id(part) {
                    Some(id) => ids.push(id),
                    None => return Err(invalid("expected comma-separated numeric ids")),
                }
            }
            Ok(ConfigValue::IdList(ids))
        }
    }
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.trim_matches(['<', '@', '&', '#', '>', ' ']).parse().ok()
}
