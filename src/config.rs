use crate::constants::{OAUTH_TOKEN_URL, PRIVATE_URL, PUBLIC_URL};
use crate::errors::{AppError, AppResult};
use crate::models::ResponseFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Client configuration with all values filled in.
///
/// Every field has a default, so a TOML file only needs to name what it
/// changes. Unknown keys are rejected to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Format requested from YQL when a call does not override it
    pub format: ResponseFormat,
    /// Prefix queries with the datatables.org community environment
    pub community: bool,
    /// Ask YQL to include diagnostics in the response
    pub diagnostics: bool,
    /// Ask YQL to include debug information in the response
    pub debug: bool,
    /// Request the compact JSON layout (`jsonCompact=new`)
    pub json_compact: bool,
    /// Request optimized cross products (`crossProduct=optimized`)
    pub cross_product: bool,

    // Endpoints
    /// Endpoint for unsigned queries
    pub public_url: String,
    /// Endpoint for OAuth-signed queries
    pub private_url: String,
    /// Endpoint used to refresh OAuth access tokens
    pub token_url: String,

    // HTTP
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// JSON file holding OAuth credentials; queries are signed when set
    pub credentials_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            format: ResponseFormat::Json,
            community: false,
            diagnostics: false,
            debug: false,
            json_compact: false,
            cross_product: false,
            public_url: PUBLIC_URL.to_string(),
            private_url: PRIVATE_URL.to_string(),
            token_url: OAUTH_TOKEN_URL.to_string(),
            timeout_secs: 30,
            user_agent: concat!("myql/", env!("CARGO_PKG_VERSION")).to_string(),
            credentials_file: None,
        }
    }
}

impl ClientConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, unknown keys are present
    /// or the timeout is zero, and `UrlError` if an endpoint is not a valid URL.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the values a TOML file or a caller may have set.
    pub fn validate(&self) -> AppResult<()> {
        if self.timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Timeout must be greater than 0".into(),
            ));
        }
        Url::parse(&self.public_url)?;
        Url::parse(&self.private_url)?;
        Url::parse(&self.token_url)?;
        Ok(())
    }
}
