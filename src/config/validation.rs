use super::Config;
use anyhow::Result;
use tracing::warn;

/// Validation errors for configuration.
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a configuration object.
pub fn validate_config(config: &Config) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    if config.gateway.port == 0 {
        errors.push(ConfigValidationError {
            path: "gateway.port".to_string(),
            message: "Port must be greater than 0".to_string(),
        });
    }

    for (path, base_url) in [
        ("backend.baseUrl", &config.backend.base_url),
        ("remote.baseUrl", &config.remote.base_url),
    ] {
        if let Some(url) = base_url {
            if url::Url::parse(url).is_err() {
                errors.push(ConfigValidationError {
                    path: path.to_string(),
                    message: format!("'{url}' is not a valid URL"),
                });
            }
        }
    }

    if config.remote.base_url.is_some() && config.remote.api_key.is_none() {
        warn!("Remote platform URL is configured but no API key is set");
    }

    errors
}

/// Validate configuration and return Result.
pub fn validate_config_object(config: &Config) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        anyhow::bail!("Configuration validation failed:\n{}", messages.join("\n"));
    }
}
