use crate::crawler::PageCallback;
use crate::ConfigError;
use regex::Regex;

/// Page callback returning every match of a regular expression
#[derive(Debug, Clone)]
pub struct PatternCallback {
    regex: Regex,
}

impl PatternCallback {
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;
        Ok(Self { regex })
    }
}

impl PageCallback<String> for PatternCallback {
    fn process(&self, text: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect())
    }
}
