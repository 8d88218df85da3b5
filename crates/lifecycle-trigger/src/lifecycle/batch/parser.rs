use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::lifecycle::domain::{AccountLink, IdentityId, IdentitySnapshot, ProcessingState};
use crate::lifecycle::lookup::parse_flag;

#[derive(Debug)]
pub(crate) struct BatchRecord {
    pub(crate) line: u64,
    pub(crate) identity: IdentityId,
    pub(crate) process: String,
    pub(crate) previous: Option<IdentitySnapshot>,
    pub(crate) current: IdentitySnapshot,
}

#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Invalid { line: u64, reason: String },
}

impl From<csv::Error> for RowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<BatchRecord>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let raw = result?;
        let mut row: BatchRow = raw.deserialize(Some(&headers))?;
        row.line = raw.position().map(|position| position.line()).unwrap_or_default();
        records.push(row.into_record()?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BatchRow {
    #[serde(skip)]
    line: u64,
    identity: String,
    #[serde(default)]
    display_name: String,
    process: String,
    #[serde(default, deserialize_with = "flag")]
    is_new: bool,
    #[serde(default)]
    previous_state: String,
    #[serde(default, deserialize_with = "flag")]
    previous_correlated: bool,
    #[serde(default)]
    previous_links: String,
    #[serde(default)]
    state: String,
    #[serde(default, deserialize_with = "flag")]
    correlated: bool,
    #[serde(default)]
    links: String,
}

impl BatchRow {
    fn into_record(self) -> Result<BatchRecord, RowError> {
        let line = self.line;
        let invalid = |reason: String| RowError::Invalid { line, reason };

        if self.identity.is_empty() {
            return Err(invalid("identity column is empty".to_string()));
        }

        let display_name = if self.display_name.is_empty() {
            self.identity.clone()
        } else {
            self.display_name
        };

        let current = IdentitySnapshot::new(display_name.clone())
            .with_state(
                ProcessingState::parse_optional(&self.state)
                    .map_err(|err| invalid(err.to_string()))?,
            )
            .with_correlated(self.correlated)
            .with_links(parse_links(&self.links).map_err(invalid)?);

        let previous = if self.is_new {
            None
        } else {
            Some(
                IdentitySnapshot::new(display_name)
                    .with_state(
                        ProcessingState::parse_optional(&self.previous_state)
                            .map_err(|err| invalid(err.to_string()))?,
                    )
                    .with_correlated(self.previous_correlated)
                    .with_links(parse_links(&self.previous_links).map_err(invalid)?),
            )
        };

        Ok(BatchRecord {
            line,
            identity: IdentityId(self.identity),
            process: self.process,
            previous,
            current,
        })
    }
}

fn parse_links(raw: &str) -> Result<Vec<AccountLink>, String> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    parse_flag(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("expected a boolean, found '{}'", raw.trim()))
    })
}
