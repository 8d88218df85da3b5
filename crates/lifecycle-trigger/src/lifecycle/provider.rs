use super::domain::{IdentityId, IdentitySnapshot};

/// Storage abstraction yielding the persisted states an identity is compared across.
pub trait IdentitySnapshotProvider: Send + Sync {
    /// State as of the change being evaluated. `None` when the identity is unknown.
    fn current(&self, identity: &IdentityId) -> Result<Option<IdentitySnapshot>, ProviderError>;

    /// State before the change. `None` when the identity did not exist before.
    fn previous(&self, identity: &IdentityId)
        -> Result<Option<IdentitySnapshot>, ProviderError>;
}

/// Error enumeration for snapshot store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
    #[error("stored snapshot for '{identity}' is unreadable: {reason}")]
    Corrupt { identity: IdentityId, reason: String },
}
