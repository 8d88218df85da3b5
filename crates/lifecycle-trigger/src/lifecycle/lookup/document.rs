use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::RwLock;

use serde_json::Value;

use super::{dotted, ConfigurationLookup, LookupError};

/// Nested JSON policy document, replaceable while decisions are being served.
#[derive(Debug)]
pub struct DocumentConfiguration {
    document: RwLock<Value>,
}

impl DocumentConfiguration {
    pub fn empty() -> Self {
        Self::from_value(Value::Object(Default::default()))
    }

    pub fn from_value(document: Value) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        let document = serde_json::from_reader(reader)?;
        Ok(Self::from_value(document))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file)).map_err(std::io::Error::from)
    }

    /// Swap in a new document; later lookups observe it.
    pub fn replace(&self, document: Value) -> Result<(), LookupError> {
        let mut guard = self
            .document
            .write()
            .map_err(|_| LookupError::Unavailable("policy document lock poisoned".to_string()))?;
        *guard = document;
        Ok(())
    }

    pub fn reload_from_reader<R: Read>(&self, reader: R) -> Result<(), LookupError> {
        let document: Value = serde_json::from_reader(reader)
            .map_err(|err| LookupError::Unavailable(format!("invalid policy document: {err}")))?;
        self.replace(document)
    }
}

impl Default for DocumentConfiguration {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigurationLookup for DocumentConfiguration {
    fn lookup(&self, path: &[&str]) -> Result<Option<String>, LookupError> {
        let guard = self
            .document
            .read()
            .map_err(|_| LookupError::Unavailable("policy document lock poisoned".to_string()))?;

        let mut node = &*guard;
        for segment in path {
            match node.get(*segment) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }

        match node {
            Value::Null => Ok(None),
            Value::Bool(flag) => Ok(Some(flag.to_string())),
            Value::Number(number) => Ok(Some(number.to_string())),
            Value::String(text) => Ok(Some(text.clone())),
            Value::Array(_) | Value::Object(_) => Err(LookupError::InvalidValue {
                path: dotted(path),
                expected: "scalar",
                found: node.to_string(),
            }),
        }
    }
}
