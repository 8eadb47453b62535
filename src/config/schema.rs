use serde::{Deserialize, Serialize};

use crate::impute::ImputationParams;

/// Contents of `config.yaml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub input: InputConfig,
    pub imputation: ImputationParams,
    pub charts: ChartsConfig,
    pub theme: ThemeMode,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Field separator of the input table, a single ASCII character
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

impl InputConfig {
    /// The delimiter as a byte, if it is exactly one ASCII character.
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ChartsConfig {
    /// Vendors shown in each top/bottom chart
    pub top_n: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

/// Palette selection for colored output and the interactive viewer.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}
