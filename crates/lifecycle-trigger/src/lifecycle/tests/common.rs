use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::lifecycle::domain::{AccountLink, IdentityId, IdentitySnapshot, ProcessingState};
use crate::lifecycle::engine::DecisionEngine;
use crate::lifecycle::lookup::{ConfigurationLookup, DocumentConfiguration, LookupError};
use crate::lifecycle::provider::{IdentitySnapshotProvider, ProviderError};

pub(super) fn joiner_policy(options: Value) -> Value {
    json!({ "business-processes": { "joiner": options } })
}

pub(super) fn engine(policy: Value) -> DecisionEngine<DocumentConfiguration> {
    DecisionEngine::new(DocumentConfiguration::from_value(policy))
}

pub(super) fn unconfigured_engine() -> DecisionEngine<DocumentConfiguration> {
    DecisionEngine::new(DocumentConfiguration::empty())
}

pub(super) fn link(application: &str, id: &str) -> AccountLink {
    AccountLink {
        application: application.to_string(),
        native_identity: id.to_string(),
    }
}

pub(super) fn snapshot(state: Option<ProcessingState>, correlated: bool) -> IdentitySnapshot {
    IdentitySnapshot::new("Ada Lovelace")
        .with_state(state)
        .with_correlated(correlated)
}

/// Existing identity with an HR account, the usual `previous` snapshot.
pub(super) fn linked(state: Option<ProcessingState>, correlated: bool) -> IdentitySnapshot {
    snapshot(state, correlated).with_link(link("hr", "1001"))
}

pub(super) const ALL_STATES: [Option<ProcessingState>; 5] = [
    None,
    Some(ProcessingState::Needed),
    Some(ProcessingState::Processed),
    Some(ProcessingState::Skipped),
    Some(ProcessingState::Forced),
];

/// Every policy combination the checks read, all flags on or off independently.
pub(super) fn policy_grid() -> Vec<Value> {
    let mut grid = Vec::new();
    for bits in 0u8..16 {
        let flag = |bit: u8| bits & (1 << bit) != 0;
        let options = json!({
            "require-correlated": flag(0),
            "auto-join-new-empty-identities": flag(1),
            "reprocess-skipped": flag(2),
        });
        grid.push(json!({
            "business-processes": {
                "joiner": options,
                "mover": { "require-correlated": flag(3) },
                "leaver": { "require-correlated": flag(3) }
            }
        }));
    }
    grid
}

/// Lookup that fails every read, standing in for an unreachable configuration store.
pub(super) struct UnavailableLookup;

impl ConfigurationLookup for UnavailableLookup {
    fn lookup(&self, _path: &[&str]) -> Result<Option<String>, LookupError> {
        Err(LookupError::Unavailable("policy store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct InMemorySnapshotProvider {
    current: Mutex<HashMap<IdentityId, IdentitySnapshot>>,
    previous: Mutex<HashMap<IdentityId, IdentitySnapshot>>,
    outage: Mutex<Option<String>>,
}

impl InMemorySnapshotProvider {
    pub(super) fn with_identity(
        self,
        id: &str,
        previous: Option<IdentitySnapshot>,
        current: IdentitySnapshot,
    ) -> Self {
        let id = IdentityId(id.to_string());
        if let Some(previous) = previous {
            self.previous
                .lock()
                .expect("provider mutex poisoned")
                .insert(id.clone(), previous);
        }
        self.current
            .lock()
            .expect("provider mutex poisoned")
            .insert(id, current);
        self
    }

    pub(super) fn fail_with(&self, reason: &str) {
        *self.outage.lock().expect("provider mutex poisoned") = Some(reason.to_string());
    }

    fn check_outage(&self) -> Result<(), ProviderError> {
        match self.outage.lock().expect("provider mutex poisoned").clone() {
            Some(reason) => Err(ProviderError::Unavailable(reason)),
            None => Ok(()),
        }
    }
}

impl IdentitySnapshotProvider for InMemorySnapshotProvider {
    fn current(&self, identity: &IdentityId) -> Result<Option<IdentitySnapshot>, ProviderError> {
        self.check_outage()?;
        Ok(self
            .current
            .lock()
            .expect("provider mutex poisoned")
            .get(identity)
            .cloned())
    }

    fn previous(
        &self,
        identity: &IdentityId,
    ) -> Result<Option<IdentitySnapshot>, ProviderError> {
        self.check_outage()?;
        Ok(self
            .previous
            .lock()
            .expect("provider mutex poisoned")
            .get(identity)
            .cloned())
    }
}
