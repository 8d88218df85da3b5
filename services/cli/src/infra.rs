use lifecycle_trigger::config::PolicyConfig;
use lifecycle_trigger::error::AppError;
use lifecycle_trigger::lifecycle::{
    DocumentConfiguration, EnvConfiguration, IdentityId, IdentitySnapshot,
    IdentitySnapshotProvider, LayeredConfiguration, ProviderError,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub(crate) type PolicyLookup = LayeredConfiguration<EnvConfiguration, DocumentConfiguration>;

/// Environment overrides layered over the optional JSON policy document.
pub(crate) fn load_policy(
    config: &PolicyConfig,
    document_override: Option<PathBuf>,
) -> Result<PolicyLookup, AppError> {
    let document = match document_override.or_else(|| config.document_path.clone()) {
        Some(path) => DocumentConfiguration::from_path(path)?,
        None => DocumentConfiguration::empty(),
    };

    Ok(LayeredConfiguration::new(
        EnvConfiguration::new(config.env_prefix.clone()),
        document,
    ))
}

#[derive(Debug, Default, Deserialize)]
struct StoredIdentity {
    #[serde(default)]
    previous: Option<IdentitySnapshot>,
    #[serde(default)]
    current: Option<IdentitySnapshot>,
}

/// Snapshot store backed by a JSON file of `{ "<id>": { "previous": .., "current": .. } }`.
#[derive(Debug, Default)]
pub(crate) struct FileSnapshotStore {
    identities: HashMap<IdentityId, StoredIdentity>,
}

impl FileSnapshotStore {
    pub(crate) fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub(crate) fn from_reader<R: Read>(reader: R) -> Result<Self, AppError> {
        let raw: HashMap<String, StoredIdentity> = serde_json::from_reader(reader)?;
        let identities = raw
            .into_iter()
            .map(|(id, stored)| (IdentityId(id), stored))
            .collect();
        Ok(Self { identities })
    }
}

impl IdentitySnapshotProvider for FileSnapshotStore {
    fn current(&self, identity: &IdentityId) -> Result<Option<IdentitySnapshot>, ProviderError> {
        Ok(self
            .identities
            .get(identity)
            .and_then(|stored| stored.current.clone()))
    }

    fn previous(
        &self,
        identity: &IdentityId,
    ) -> Result<Option<IdentitySnapshot>, ProviderError> {
        Ok(self
            .identities
            .get(identity)
            .and_then(|stored| stored.previous.clone()))
    }
}
