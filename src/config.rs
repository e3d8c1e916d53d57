/// Default RD Station API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.rdstation.com.br/api/";

/// Default lead-source identifier sent as `identificador`.
pub const DEFAULT_IDENTIFIER: &str = "rdstation-php-integration";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub private_token: String,
    pub public_token: Option<String>,
    pub base_url: String,
    pub default_identifier: String,
    /// Send `https` URLs as plain HTTP on port 80, like the legacy socket client.
    pub plaintext_transport: bool,
    /// Read the response body into `Delivery::body`.
    pub capture_response: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            private_token: String::new(),
            public_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_identifier: DEFAULT_IDENTIFIER.to_string(),
            plaintext_transport: true,
            capture_response: false,
        }
    }
}

impl ClientConfig {
    pub fn new(private_token: impl Into<String>, public_token: Option<String>) -> Self {
        Self {
            private_token: private_token.into(),
            public_token,
            ..Self::default()
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            private_token: std::env::var("RDSTATION_PRIVATE_TOKEN")
                .map_err(|_| {
                    anyhow::anyhow!("RDSTATION_PRIVATE_TOKEN environment variable required")
                })
                .and_then(|token| {
                    if token.trim().is_empty() {
                        anyhow::bail!("RDSTATION_PRIVATE_TOKEN cannot be empty");
                    }
                    Ok(token)
                })?,
            public_token: std::env::var("RDSTATION_PUBLIC_TOKEN")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            base_url: match std::env::var("RDSTATION_BASE_URL") {
                Ok(url) if !url.trim().is_empty() => {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("RDSTATION_BASE_URL must start with http:// or https://");
                    }
                    url
                }
                _ => defaults.base_url,
            },
            default_identifier: std::env::var("RDSTATION_IDENTIFIER")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.default_identifier),
            plaintext_transport: parse_flag("RDSTATION_PLAINTEXT", defaults.plaintext_transport)?,
            capture_response: parse_flag(
                "RDSTATION_CAPTURE_RESPONSE",
                defaults.capture_response,
            )?,
        };

        // Tokens stay out of the logs
        tracing::info!("RD Station client configuration loaded");
        tracing::debug!("RD Station base URL: {}", config.base_url);
        tracing::debug!(
            "Public token configured: {}",
            config.public_token.is_some()
        );
        tracing::debug!("Default identifier: {}", config.default_identifier);

        Ok(config)
    }
}

fn parse_flag(name: &str, default: bool) -> anyhow::Result<bool> {
    match std::env::var(name) {
        Ok(raw) => parse_bool(&raw)
            .ok_or_else(|| anyhow::anyhow!("{} must be true/false, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("123", Some("456".to_string()));
        assert_eq!(config.private_token, "123");
        assert_eq!(config.public_token.as_deref(), Some("456"));
        assert_eq!(config.base_url, "https://www.rdstation.com.br/api/");
        assert_eq!(config.default_identifier, "rdstation-php-integration");
        assert!(config.plaintext_transport);
        assert!(!config.capture_response);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
