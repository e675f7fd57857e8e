//! Configuration for the group visibility module.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Module configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupVisibilityConfig {
    /// Reject malformed primary context keys with an error instead of
    /// answering with an empty group list.
    pub strict_context_keys: bool,

    /// Ask the directory for full group details (nested member ids).
    pub fetch_group_details: bool,

    /// Upper bound for one exposed call, e.g. `"30s"`.
    ///
    /// Unset means no limit. Without an organization filter an ADMIN
    /// resolution enumerates the whole directory, so production setups
    /// should set this.
    #[serde(with = "humantime_opt")]
    pub resolution_timeout: Option<Duration>,
}

impl Default for GroupVisibilityConfig {
    fn default() -> Self {
        Self {
            strict_context_keys: false,
            fetch_group_details: true,
            resolution_timeout: None,
        }
    }
}

mod humantime_opt {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn deserialize<'de, D>(d: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(d)?
            .map(|raw| humantime::parse_duration(&raw).map_err(de::Error::custom))
            .transpose()
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => s.serialize_some(&humantime::format_duration(*d).to_string()),
            None => s.serialize_none(),
        }
    }
}
