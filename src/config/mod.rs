//! Configuration module for Ripple-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration once seeds are supplied.
//!
//! # Example
//!
//! ```no_run
//! use ripple_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractConfig, ExtractKind, OutputConfig, UserAgentConfig,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::{validate, validate_seed_url};
pub(crate) use validation::{validate_crawler_config, validate_user_agent_config};
