use serde::Deserialize;
use shark_core::{Failure, Options, Result};

pub const DEFAULT_MAX_OPEN_HANDLES: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawMemoryStoreConfig")]
pub struct MemoryStoreConfig {
    /// Upper bound on simultaneously open identifiers.
    pub max_open_handles: usize,
    /// Reject every call that would create an object.
    pub read_only: bool,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_open_handles: DEFAULT_MAX_OPEN_HANDLES,
            read_only: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawMemoryStoreConfig {
    max_open_handles: usize,
    read_only: bool,
}

impl Default for RawMemoryStoreConfig {
    fn default() -> Self {
        let defaults = MemoryStoreConfig::default();
        Self {
            max_open_handles: defaults.max_open_handles,
            read_only: defaults.read_only,
        }
    }
}

impl TryFrom<RawMemoryStoreConfig> for MemoryStoreConfig {
    type Error = Failure;

    fn try_from(raw: RawMemoryStoreConfig) -> Result<Self> {
        let config = Self {
            max_open_handles: raw.max_open_handles,
            read_only: raw.read_only,
        };
        config.validate()?;
        Ok(config)
    }
}

impl MemoryStoreConfig {
    /// Reads the `store.*` options, falling back to defaults for absent keys.
    pub fn from_options(options: &Options) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            max_open_handles: options
                .get_or("store.max_open_handles", defaults.max_open_handles)?,
            read_only: options.get_or("store.read_only", defaults.read_only)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Fails with `InvalidOption` unless at least one handle may be open.
    pub fn validate(&self) -> Result<()> {
        if self.max_open_handles == 0 {
            return Err(Failure::InvalidOption(
                "store.max_open_handles must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shark_core::FailureKind;

    #[test]
    fn test_defaults() {
        let config = MemoryStoreConfig::from_options(&Options::default()).unwrap();
        assert_eq!(config, MemoryStoreConfig::default());
        assert_eq!(config.max_open_handles, DEFAULT_MAX_OPEN_HANDLES);
    }

    #[test]
    fn test_from_options() {
        let options = Options::parse("store.max_open_handles = 2\nstore.read_only = true").unwrap();
        let config = MemoryStoreConfig::from_options(&options).unwrap();
        assert_eq!(config.max_open_handles, 2);
        assert!(config.read_only);
    }

    #[test]
    fn test_zero_handles_rejected() {
        let options = Options::parse("store.max_open_handles = 0").unwrap();
        let err = MemoryStoreConfig::from_options(&options).unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidOption);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: MemoryStoreConfig = serde_json::from_str(r#"{"read_only": true}"#).unwrap();
        assert!(config.read_only);
        assert_eq!(config.max_open_handles, DEFAULT_MAX_OPEN_HANDLES);
    }

    #[test]
    fn test_deserialize_rejects_zero_handles() {
        let err = serde_json::from_str::<MemoryStoreConfig>(r#"{"max_open_handles": 0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_validate() {
        assert!(MemoryStoreConfig::default().validate().is_ok());
        let config = MemoryStoreConfig {
            max_open_handles: 0,
            read_only: false,
        };
        assert_eq!(config.validate().unwrap_err().kind(), FailureKind::InvalidOption);
    }
}
