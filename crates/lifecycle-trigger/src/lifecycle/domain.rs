use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for identities handed to the trigger service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityId(pub String);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-identity marker written by the process launcher after a decision is acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingState {
    Needed,
    Processed,
    Skipped,
    Forced,
}

impl ProcessingState {
    pub const fn label(self) -> &'static str {
        match self {
            ProcessingState::Needed => "NEEDED",
            ProcessingState::Processed => "PROCESSED",
            ProcessingState::Skipped => "SKIPPED",
            ProcessingState::Forced => "FORCED",
        }
    }

    /// Parse an optional marker where a blank value means "unset".
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, UnknownProcessingState> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProcessingState {
    type Err = UnknownProcessingState;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "NEEDED" => Ok(Self::Needed),
            "PROCESSED" => Ok(Self::Processed),
            "SKIPPED" => Ok(Self::Skipped),
            "FORCED" => Ok(Self::Forced),
            _ => Err(UnknownProcessingState(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown processing state '{0}'")]
pub struct UnknownProcessingState(pub String);

/// Reference from an identity to an account on a connected application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLink {
    pub application: String,
    pub native_identity: String,
}

impl FromStr for AccountLink {
    type Err = String;

    /// Parses `application:native_identity`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (application, native_identity) = value
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("account link '{value}' must look like application:id"))?;
        let application = application.trim();
        let native_identity = native_identity.trim();
        if application.is_empty() || native_identity.is_empty() {
            return Err(format!("account link '{value}' has an empty component"));
        }

        Ok(Self {
            application: application.to_string(),
            native_identity: native_identity.to_string(),
        })
    }
}

/// Read-only view of an identity's persisted state at one point in time.
///
/// Fields are only reachable through accessors so a snapshot cannot change after it is
/// built; the `with_*` helpers consume and return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    display_name: String,
    #[serde(default, deserialize_with = "blank_state_as_none")]
    processing_state: Option<ProcessingState>,
    #[serde(default)]
    correlated: bool,
    #[serde(default)]
    links: Vec<AccountLink>,
}

impl IdentitySnapshot {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            processing_state: None,
            correlated: false,
            links: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: Option<ProcessingState>) -> Self {
        self.processing_state = state;
        self
    }

    pub fn with_correlated(mut self, correlated: bool) -> Self {
        self.correlated = correlated;
        self
    }

    pub fn with_link(mut self, link: AccountLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_links(mut self, links: Vec<AccountLink>) -> Self {
        self.links = links;
        self
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn processing_state(&self) -> Option<ProcessingState> {
        self.processing_state
    }

    pub fn is_correlated(&self) -> bool {
        self.correlated
    }

    pub fn links(&self) -> &[AccountLink] {
        &self.links
    }

    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }
}

fn blank_state_as_none<'de, D>(deserializer: D) -> Result<Option<ProcessingState>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => ProcessingState::parse_optional(&value).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Lifecycle business processes the engine knows a dedicated check for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    Joiner,
    Mover,
    Leaver,
    Unknown,
}

impl ProcessKind {
    /// Never fails: names without a dedicated check resolve to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "joiner" => Self::Joiner,
            "mover" => Self::Mover,
            "leaver" => Self::Leaver,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProcessKind::Joiner => "joiner",
            ProcessKind::Mover => "mover",
            ProcessKind::Leaver => "leaver",
            ProcessKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
