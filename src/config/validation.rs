use crate::config::types::{BatchConfig, ClassifierConfig, Config, CrawlerConfig, RendererConfig};
use crate::url::{is_valid_url, normalize};
use crate::ConfigError;
use url::Url;

/// Upper bound accepted for the admission ceiling
const MAX_CONCURRENT_PAGES_LIMIT: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_classifier_config(&config.classifier)?;
    validate_user_agent(&config.user_agent.crawler_name)?;
    validate_renderer_config(&config.renderer)?;
    validate_batch_config(&config.batch)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_pages < 1 || config.max_concurrent_pages > MAX_CONCURRENT_PAGES_LIMIT
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages must be between 1 and {}, got {}",
            MAX_CONCURRENT_PAGES_LIMIT, config.max_concurrent_pages
        )));
    }

    if !is_valid_url(&config.default_url) {
        return Err(ConfigError::InvalidUrl(format!(
            "Invalid default_url '{}'",
            config.default_url
        )));
    }

    Url::parse(&normalize(&config.default_url)).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid default_url '{}': {}",
            config.default_url, e
        ))
    })?;

    if config.data_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data_root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the menu classifier policy
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    if config.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "classifier keywords cannot be empty".to_string(),
        ));
    }

    if let Some(empty) = config.keywords.iter().position(|k| k.is_empty()) {
        return Err(ConfigError::Validation(format!(
            "classifier keyword #{} is empty",
            empty
        )));
    }

    Ok(())
}

/// Validates the crawler name used in the User-Agent header
fn validate_user_agent(crawler_name: &str) -> Result<(), ConfigError> {
    if crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, '-' and '_', got '{}'",
            crawler_name
        )));
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.program.trim().is_empty() {
        return Err(ConfigError::Validation(
            "renderer program cannot be empty".to_string(),
        ));
    }

    for placeholder in ["{url}", "{output}"] {
        if !config.args.iter().any(|arg| arg.contains(placeholder)) {
            return Err(ConfigError::Validation(format!(
                "renderer args must contain the {} placeholder",
                placeholder
            )));
        }
    }

    Ok(())
}

/// Validates batch seed list configuration
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.query.trim().is_empty() {
        return Err(ConfigError::Validation(
            "batch query cannot be empty".to_string(),
        ));
    }

    Ok(())
}
