//! Global configuration settings

use serde::Deserialize;

/// Global configuration that applies to all components
///
/// All fields have sensible defaults - you only need to specify what
/// you want to change.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default batch size for warehouse inserts (rows per batch)
    /// Default: 500
    pub batch_size: usize,

    /// Directory for the control store database files
    /// Default: "data"
    pub data_dir: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            batch_size: 500,
            data_dir: "data".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.data_dir, "data");
    }
}
