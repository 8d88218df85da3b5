use std::env;

use super::{dotted, ConfigurationLookup, LookupError};

pub const DEFAULT_ENV_PREFIX: &str = "LIFECYCLE";

/// Reads policy flags from the process environment on every lookup.
///
/// `business-processes.joiner.require-correlated` with prefix `LIFECYCLE` is read from
/// `LIFECYCLE_BUSINESS_PROCESSES_JOINER_REQUIRE_CORRELATED`.
#[derive(Debug, Clone)]
pub struct EnvConfiguration {
    prefix: String,
}

impl EnvConfiguration {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn variable_name(&self, path: &[&str]) -> String {
        let mut name = self.prefix.clone();
        for segment in path {
            name.push('_');
            name.extend(segment.chars().map(|ch| {
                if ch.is_ascii_alphanumeric() {
                    ch.to_ascii_uppercase()
                } else {
                    '_'
                }
            }));
        }
        name
    }
}

impl Default for EnvConfiguration {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl ConfigurationLookup for EnvConfiguration {
    fn lookup(&self, path: &[&str]) -> Result<Option<String>, LookupError> {
        match env::var(self.variable_name(path)) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(raw)) => Err(LookupError::InvalidValue {
                path: dotted(path),
                expected: "unicode string",
                found: raw.to_string_lossy().into_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env_guard;

    #[test]
    fn variable_names_are_upper_snake_case() {
        let config = EnvConfiguration::default();
        let path = ["business-processes", "joiner", "auto-join-new-empty-identities"];

        assert_eq!(
            config.variable_name(&path),
            "LIFECYCLE_BUSINESS_PROCESSES_JOINER_AUTO_JOIN_NEW_EMPTY_IDENTITIES"
        );
    }

    #[test]
    fn reads_environment_on_every_lookup() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        let config = EnvConfiguration::new("LIFECYCLE_ENVTEST");
        let path = ["business-processes", "leaver", "require-correlated"];
        let name = config.variable_name(&path);

        env::remove_var(&name);
        assert!(!config.get_bool(&path).expect("lookup"));

        env::set_var(&name, "true");
        assert!(config.get_bool(&path).expect("lookup"));

        env::remove_var(&name);
        assert!(!config.get_bool(&path).expect("lookup"));
    }
}
