//! Named blocks of string-typed properties.
//!
//! Values stay strings until a consumer asks for a typed view, so a block can
//! carry settings for several components without a shared schema.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ordered key/value pairs of one property block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBlock {
    values: IndexMap<String, String>,
}

impl PropertyBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    /// Parse a required property.
    pub fn parse<T>(&self, key: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        parse_value(key, self.require(key)?)
    }

    /// Parse a property that may be absent.
    pub fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get(key).map(|raw| parse_value(key, raw)).transpose()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: err.to_string(),
        })
}

/// All property blocks of a run, keyed by block name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    blocks: IndexMap<String, PropertyBlock>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, name: impl Into<String>, block: PropertyBlock) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    pub fn insert_block(&mut self, name: impl Into<String>, block: PropertyBlock) {
        self.blocks.insert(name.into(), block);
    }

    pub fn block(&self, name: &str) -> Result<&PropertyBlock, ConfigError> {
        self.blocks
            .get(name)
            .ok_or_else(|| ConfigError::MissingBlock(name.to_string()))
    }

    /// Load from JSON shaped as `{ "block": { "key": "value", ... }, ... }`.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_blocks_from_json() {
        let props = Properties::from_json_str(
            r#"{ "solver": { "startTime": "0.0", "finalTime": "1.5" } }"#,
        )
        .unwrap();
        let solver = props.block("solver").unwrap();
        assert_eq!(solver.parse::<f64>("finalTime").unwrap(), 1.5);
        assert_eq!(solver.len(), 2);
    }

    #[test]
    fn missing_block_and_key_are_reported() {
        let props = Properties::new().with_block("solver", PropertyBlock::new());
        assert!(matches!(
            props.block("mesh"),
            Err(ConfigError::MissingBlock(name)) if name == "mesh"
        ));
        let solver = props.block("solver").unwrap();
        assert!(matches!(
            solver.parse::<f64>("finalTime"),
            Err(ConfigError::Missing(key)) if key == "finalTime"
        ));
    }

    #[test]
    fn malformed_number_is_invalid_value() {
        let block = PropertyBlock::new().with("initialTimeStep", "fast");
        let err = block.parse::<f64>("initialTimeStep").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref value, .. } if value == "fast"));
    }

    #[test]
    fn optional_values_tolerate_absence() {
        let block = PropertyBlock::new().with("outputStepFrequency", " 5 ");
        assert_eq!(block.parse_optional::<usize>("outputStepFrequency").unwrap(), Some(5));
        assert_eq!(block.parse_optional::<usize>("missing").unwrap(), None);
    }
}
