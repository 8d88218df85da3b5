//! Read-only access to deployment policy flags keyed by hierarchical paths.

mod document;
mod env;

pub use document::DocumentConfiguration;
pub use env::{EnvConfiguration, DEFAULT_ENV_PREFIX};

use std::sync::Arc;

use super::domain::ProcessKind;

/// Top-level section holding one sub-tree per lifecycle process.
pub const BUSINESS_PROCESS_SECTION: &str = "business-processes";

/// Failure raised by a configuration source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("configuration value at '{path}' is not a valid {expected}: {found}")]
    InvalidValue {
        path: String,
        expected: &'static str,
        found: String,
    },
    #[error("configuration source unavailable: {0}")]
    Unavailable(String),
}

/// Source of policy flags. Unset values are not errors.
pub trait ConfigurationLookup: Send + Sync {
    /// Raw textual value at `path`, `None` when unset.
    fn lookup(&self, path: &[&str]) -> Result<Option<String>, LookupError>;

    /// Flag at `path`, `false` when unset.
    fn get_bool(&self, path: &[&str]) -> Result<bool, LookupError> {
        match self.lookup(path)? {
            Some(raw) => parse_flag(&raw).ok_or_else(|| LookupError::InvalidValue {
                path: dotted(path),
                expected: "boolean",
                found: raw,
            }),
            None => Ok(false),
        }
    }

    /// Text at `path`, empty when unset.
    fn get_string(&self, path: &[&str]) -> Result<String, LookupError> {
        Ok(self.lookup(path)?.unwrap_or_default())
    }
}

impl<T: ConfigurationLookup + ?Sized> ConfigurationLookup for Arc<T> {
    fn lookup(&self, path: &[&str]) -> Result<Option<String>, LookupError> {
        (**self).lookup(path)
    }
}

impl<T: ConfigurationLookup + ?Sized> ConfigurationLookup for &T {
    fn lookup(&self, path: &[&str]) -> Result<Option<String>, LookupError> {
        (**self).lookup(path)
    }
}

/// Options a process section may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyOption {
    RequireCorrelated,
    AutoJoinNewEmptyIdentities,
    ReprocessSkipped,
    TriggerFilter,
}

impl PolicyOption {
    pub const fn key(self) -> &'static str {
        match self {
            PolicyOption::RequireCorrelated => "require-correlated",
            PolicyOption::AutoJoinNewEmptyIdentities => "auto-join-new-empty-identities",
            PolicyOption::ReprocessSkipped => "reprocess-skipped",
            PolicyOption::TriggerFilter => "trigger-filter",
        }
    }
}

/// `[section, process, option]` for a process option.
pub fn option_path(process: &str, option: PolicyOption) -> [&str; 3] {
    [BUSINESS_PROCESS_SECTION, process, option.key()]
}

pub(crate) fn process_flag(
    config: &dyn ConfigurationLookup,
    process: ProcessKind,
    option: PolicyOption,
) -> Result<bool, LookupError> {
    config.get_bool(&option_path(process.label(), option))
}

pub(crate) fn dotted(path: &[&str]) -> String {
    path.join(".")
}

/// Flag grammar shared by policy lookups and batch columns. Blank reads as `false`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Consults `overrides` first and falls back to `fallback` for unset paths.
#[derive(Debug, Clone)]
pub struct LayeredConfiguration<O, F> {
    overrides: O,
    fallback: F,
}

impl<O, F> LayeredConfiguration<O, F>
where
    O: ConfigurationLookup,
    F: ConfigurationLookup,
{
    pub fn new(overrides: O, fallback: F) -> Self {
        Self {
            overrides,
            fallback,
        }
    }
}

impl<O, F> ConfigurationLookup for LayeredConfiguration<O, F>
where
    O: ConfigurationLookup,
    F: ConfigurationLookup,
{
    fn lookup(&self, path: &[&str]) -> Result<Option<String>, LookupError> {
        match self.overrides.lookup(path)? {
            Some(value) => Ok(Some(value)),
            None => self.fallback.lookup(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_values_default_to_false_and_empty() {
        let config = DocumentConfiguration::empty();
        let path = option_path("joiner", PolicyOption::RequireCorrelated);

        assert!(!config.get_bool(&path).expect("lookup succeeds"));
        assert_eq!(config.get_string(&path).expect("lookup succeeds"), "");
    }

    #[test]
    fn flags_accept_common_spellings() {
        let config = DocumentConfiguration::from_value(json!({
            "business-processes": {
                "joiner": { "require-correlated": "Yes", "reprocess-skipped": "off" },
                "mover": { "require-correlated": 1 }
            }
        }));

        assert!(config
            .get_bool(&option_path("joiner", PolicyOption::RequireCorrelated))
            .expect("flag parses"));
        assert!(!config
            .get_bool(&option_path("joiner", PolicyOption::ReprocessSkipped))
            .expect("flag parses"));
        assert!(config
            .get_bool(&option_path("mover", PolicyOption::RequireCorrelated))
            .expect("flag parses"));
    }

    #[test]
    fn flag_grammar_covers_every_spelling() {
        for raw in ["true", "YES", "y", "On", " 1 "] {
            assert_eq!(parse_flag(raw), Some(true), "{raw}");
        }
        for raw in ["false", "No", "N", "off", "0", "", "  "] {
            assert_eq!(parse_flag(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag("2"), None);
    }

    #[test]
    fn unparseable_flag_names_the_path() {
        let config = DocumentConfiguration::from_value(json!({
            "business-processes": { "leaver": { "require-correlated": "sometimes" } }
        }));

        let err = config
            .get_bool(&option_path("leaver", PolicyOption::RequireCorrelated))
            .expect_err("flag is invalid");
        match err {
            LookupError::InvalidValue { path, expected, .. } => {
                assert_eq!(path, "business-processes.leaver.require-correlated");
                assert_eq!(expected, "boolean");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn layered_prefers_overrides_and_falls_back() {
        let overrides = DocumentConfiguration::from_value(json!({
            "business-processes": { "joiner": { "require-correlated": false } }
        }));
        let fallback = DocumentConfiguration::from_value(json!({
            "business-processes": {
                "joiner": { "require-correlated": true, "reprocess-skipped": true }
            }
        }));
        let layered = LayeredConfiguration::new(overrides, fallback);

        assert!(!layered
            .get_bool(&option_path("joiner", PolicyOption::RequireCorrelated))
            .expect("lookup succeeds"));
        assert!(layered
            .get_bool(&option_path("joiner", PolicyOption::ReprocessSkipped))
            .expect("lookup succeeds"));
    }
}
