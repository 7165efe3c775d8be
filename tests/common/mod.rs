//! Common test utilities for integration tests

use myql::client::OAuthCredentials;
use myql::config::ClientConfig;
use std::fs;
use std::path::{Path, PathBuf};
use wiremock::MockServer;

pub const PUBLIC_PATH: &str = "/v1/public/yql";
pub const PRIVATE_PATH: &str = "/v1/yql";
pub const TOKEN_PATH: &str = "/oauth/v2/get_token";

/// Client configuration pointing every endpoint at a mock server
#[allow(dead_code)]
pub fn mock_config(server: &MockServer) -> ClientConfig {
    let uri = server.uri();
    ClientConfig {
        public_url: format!("{uri}{PUBLIC_PATH}"),
        private_url: format!("{uri}{PRIVATE_PATH}"),
        token_url: format!("{uri}{TOKEN_PATH}"),
        timeout_secs: 5,
        ..ClientConfig::default()
    }
}

/// Credentials with an access token issued `age_secs` ago
#[allow(dead_code)]
pub fn credentials(age_secs: i64) -> OAuthCredentials {
    OAuthCredentials {
        consumer_key: "dj0yJmk9".to_string(),
        consumer_secret: "s3cr3t".to_string(),
        access_token: Some("A=token".to_string()),
        access_token_secret: Some("tokensecret".to_string()),
        session_handle: Some("AOvHandle".to_string()),
        token_time: Some(chrono::Utc::now().timestamp() - age_secs),
        guid: None,
    }
}

/// Writes credentials as JSON and returns the file path
#[allow(dead_code)]
pub fn write_credentials(dir: &Path, credentials: &OAuthCredentials) -> PathBuf {
    let path = dir.join("credentials.json");
    fs::write(&path, serde_json::to_string_pretty(credentials).unwrap()).unwrap();
    path
}

/// Path of a file under tests/data
#[allow(dead_code)]
pub fn data_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// JSON answer of a successful select
#[allow(dead_code)]
pub const SAMPLE_RESULTS: &str = r#"{
  "query": {
    "count": 2,
    "created": "2015-02-11T10:00:00Z",
    "lang": "en-US",
    "results": {
      "place": [
        {"name": "Canada", "code": "CA"},
        {"name": "Mexico", "code": "MX"}
      ]
    }
  }
}"#;

/// JSON answer YQL sends with a 400 status
#[allow(dead_code)]
pub const SAMPLE_ERROR: &str = r#"{
  "error": {
    "lang": "en-US",
    "description": "Query syntax error(s) [line 1:4 expecting fields_or_star got 'FRM']"
  }
}"#;
