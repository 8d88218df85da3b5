mod parser;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::domain::{IdentityId, ProcessKind};
use super::engine::{DecisionEngine, DecisionError, FinalAction};
use super::lookup::ConfigurationLookup;
use parser::{BatchRecord, RowError};

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
    Decision { line: u64, source: DecisionError },
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read identity batch: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid identity batch CSV: {}", err),
            BatchImportError::InvalidRow { line, reason } => {
                write!(f, "invalid identity row on line {}: {}", line, reason)
            }
            BatchImportError::Decision { line, source } => {
                write!(f, "could not decide identity on line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
            BatchImportError::InvalidRow { .. } => None,
            BatchImportError::Decision { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RowError> for BatchImportError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Invalid { line, reason } => Self::InvalidRow { line, reason },
        }
    }
}

/// Decision for one row of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchDecision {
    pub line: u64,
    pub identity: IdentityId,
    pub process: ProcessKind,
    pub process_name: String,
    pub action: FinalAction,
}

/// Decisions for a whole batch plus per-action tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub decisions: Vec<BatchDecision>,
    pub tallies: BTreeMap<&'static str, usize>,
}

impl BatchReport {
    fn record(&mut self, decision: BatchDecision) {
        *self.tallies.entry(decision.action.label()).or_default() += 1;
        self.decisions.push(decision);
    }

    pub fn count(&self, action: FinalAction) -> usize {
        self.tallies.get(action.label()).copied().unwrap_or(0)
    }

    /// Identities the launcher must mark as skipped.
    pub fn marked_skipped(&self) -> impl Iterator<Item = &IdentityId> {
        self.decisions
            .iter()
            .filter(|decision| decision.action.required_marker().is_some())
            .map(|decision| &decision.identity)
    }
}

/// Runs every identity in a CSV export through the decision engine.
pub struct BatchImporter;

impl BatchImporter {
    pub fn from_path<P, C>(
        path: P,
        engine: &DecisionEngine<C>,
    ) -> Result<BatchReport, BatchImportError>
    where
        P: AsRef<Path>,
        C: ConfigurationLookup,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, engine)
    }

    pub fn from_reader<R, C>(
        reader: R,
        engine: &DecisionEngine<C>,
    ) -> Result<BatchReport, BatchImportError>
    where
        R: Read,
        C: ConfigurationLookup,
    {
        let records = parser::parse_records(reader)?;
        let mut report = BatchReport::default();

        for record in records {
            report.record(decide_record(record, engine)?);
        }

        Ok(report)
    }
}

fn decide_record<C: ConfigurationLookup>(
    record: BatchRecord,
    engine: &DecisionEngine<C>,
) -> Result<BatchDecision, BatchImportError> {
    let BatchRecord {
        line,
        identity,
        process,
        previous,
        current,
    } = record;

    let action = engine
        .decide(
            &process,
            previous.as_ref(),
            Some(&current),
            current.display_name(),
        )
        .map_err(|source| BatchImportError::Decision { line, source })?;

    Ok(BatchDecision {
        line,
        identity,
        process: ProcessKind::from_name(&process),
        process_name: process.trim().to_string(),
        action,
    })
}
