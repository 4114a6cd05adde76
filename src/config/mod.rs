//! Configuration module for Wiki-Harvest
//!
//! Settings come from an optional TOML file and from command-line flags,
//! with flags taking precedence. Validation runs once both are merged.
//!
//! # Example
//!
//! ```no_run
//! use wiki_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting {:?}", config.site.root_url);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{ClassifierConfig, Config, FetcherConfig, OutputConfig, SiteConfig};

pub use parser::{compute_config_hash, load_config, read_config, read_config_with_hash};
pub use validation::validate;
