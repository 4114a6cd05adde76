use crate::config::types::{Config, FetcherConfig, OutputConfig, SiteConfig};
use crate::extract::{CandidateQueries, Query};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    config.root_url()?;
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    validate_queries(&config.queries)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    if let Some(mirror) = &config.mirror_dir {
        if mirror.trim().is_empty() {
            return Err(ConfigError::Validation(
                "mirror_dir cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Checks that every query string parses and that required lists are present
fn validate_queries(queries: &CandidateQueries) -> Result<(), ConfigError> {
    for (field, list) in queries.lists() {
        for raw in list {
            Query::parse(raw).map_err(|e| ConfigError::InvalidQuery {
                field: field.to_string(),
                query: raw.clone(),
                message: e.to_string(),
            })?;
        }
    }

    for (field, list) in [
        ("name", &queries.name),
        ("image", &queries.image),
        ("listing-links", &queries.listing_links),
    ] {
        if list.is_empty() {
            return Err(ConfigError::Validation(format!(
                "query list '{}' must contain at least one query",
                field
            )));
        }
    }

    Ok(())
}
