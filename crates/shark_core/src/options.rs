use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{Failure, Result};

/// A set of `key = value` options, as read from the simulation's option files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    values: BTreeMap<String, String>,
}

impl Options {
    /// Parses option text. Blank lines and lines starting with `#` are ignored;
    /// every other line must be `key = value`. Later values override earlier
    /// ones.
    pub fn parse(text: &str) -> Result<Self> {
        let mut options = Self::default();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Failure::InvalidOption(format!(
                    "Line {}: expected 'key = value', got '{line}'",
                    lineno + 1
                )));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(Failure::InvalidOption(format!(
                    "Line {}: option name is empty",
                    lineno + 1
                )));
            }
            options.set(key, value.trim());
        }
        Ok(options)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of a required option.
    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self
            .raw(key)
            .ok_or_else(|| Failure::MissingOption(format!("Option '{key}' is required")))?;
        Self::convert(key, raw)
    }

    /// Value of an optional option, `default` when absent.
    pub fn get_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.raw(key) {
            Some(raw) => Self::convert(key, raw),
            None => Ok(default),
        }
    }

    fn convert<T>(key: &str, raw: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        raw.parse().map_err(|e: T::Err| {
            Failure::InvalidOption(format!("Invalid value '{raw}' for option '{key}': {e}"))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    const SAMPLE: &str = "
# store configuration
store.max_open_handles = 128

store.read_only = true
";

    #[test]
    fn test_parse_and_get() {
        let options = Options::parse(SAMPLE).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options.get::<usize>("store.max_open_handles").unwrap(), 128);
        assert!(options.get::<bool>("store.read_only").unwrap());
        assert_eq!(options.get_or("store.other", 5u32).unwrap(), 5);
    }

    #[test]
    fn test_missing_option() {
        let options = Options::default();
        let err = options.get::<usize>("store.max_open_handles").unwrap_err();
        assert_eq!(err.kind(), FailureKind::MissingOption);
        assert!(err.to_string().contains("store.max_open_handles"));
    }

    #[test]
    fn test_invalid_option_value() {
        let options = Options::parse("store.max_open_handles = many").unwrap();
        let err = options.get::<usize>("store.max_open_handles").unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidOption);
    }

    #[test]
    fn test_malformed_line() {
        let err = Options::parse("just some words").unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidOption);
        let err = Options::parse(" = 3").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
