//! Built-in page callbacks
//!
//! The binary picks one of these according to the `[extract]` section of the
//! configuration. Library users can pass any [`PageCallback`] instead.

mod bitcoin;
mod pattern;

pub use bitcoin::{is_valid_address, BitcoinAddressCallback};
pub use pattern::PatternCallback;

use crate::config::{ExtractConfig, ExtractKind};
use crate::crawler::PageCallback;
use crate::ConfigError;

/// One of the built-in extractors, chosen by configuration
#[derive(Debug, Clone)]
pub enum BuiltinCallback {
    Bitcoin(BitcoinAddressCallback),
    Pattern(PatternCallback),
}

impl PageCallback<String> for BuiltinCallback {
    fn process(&self, text: &str) -> anyhow::Result<Vec<String>> {
        match self {
            BuiltinCallback::Bitcoin(callback) => callback.process(text),
            BuiltinCallback::Pattern(callback) => callback.process(text),
        }
    }
}

/// Builds the callback described by the extraction config
pub fn callback_from_config(config: &ExtractConfig) -> Result<BuiltinCallback, ConfigError> {
    match config.kind {
        ExtractKind::Bitcoin => Ok(BuiltinCallback::Bitcoin(BitcoinAddressCallback::new())),
        ExtractKind::Pattern => {
            let pattern = config.pattern.as_deref().ok_or_else(|| {
                ConfigError::InvalidPattern("kind = \"pattern\" requires a pattern".to_string())
            })?;
            Ok(BuiltinCallback::Pattern(PatternCallback::new(pattern)?))
        }
    }
}
