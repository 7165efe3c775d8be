use crate::constants::{OAUTH_REALM, OAUTH_TOKEN_LIFETIME_SECS, OAUTH_TOKEN_MARGIN_SECS};
use crate::errors::{AppError, AppResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as-is, everything else is percent-encoded.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Credentials as stored in the JSON credentials file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_handle: Option<String>,
    /// Unix timestamp at which the access token was issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
}

/// OAuth 1.0a request signer for Yahoo APIs (HMAC-SHA1).
///
/// When loaded with [`OAuth1::from_file`], refreshed tokens are written back
/// to the same file.
#[derive(Debug, Clone)]
pub struct OAuth1 {
    credentials: OAuthCredentials,
    path: Option<PathBuf>,
}

impl OAuth1 {
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self {
            credentials,
            path: None,
        }
    }

    /// Loads credentials from a JSON file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to read credentials {}: {e}",
                path.display()
            ))
        })?;
        let credentials: OAuthCredentials = serde_json::from_str(&contents)
            .map_err(|e| AppError::OAuthError(format!("Invalid credentials file: {e}")))?;
        if credentials.consumer_key.is_empty() || credentials.consumer_secret.is_empty() {
            return Err(AppError::OAuthError(
                "Credentials file must define consumer_key and consumer_secret".into(),
            ));
        }
        Ok(Self {
            credentials,
            path: Some(path.to_path_buf()),
        })
    }

    /// Writes the current credentials back to the file they were loaded from.
    pub fn save(&self) -> AppResult<()> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&self.credentials)?;
            fs::write(path, json)?;
            debug!(path = %path.display(), "Credentials saved");
        }
        Ok(())
    }

    pub fn credentials(&self) -> &OAuthCredentials {
        &self.credentials
    }

    /// Returns true when an access token exists and has not expired yet.
    pub fn token_is_valid(&self) -> bool {
        self.token_is_valid_at(chrono::Utc::now().timestamp())
    }

    pub(crate) fn token_is_valid_at(&self, now: i64) -> bool {
        match (&self.credentials.access_token, self.credentials.token_time) {
            (Some(_), Some(issued)) => {
                now - issued < OAUTH_TOKEN_LIFETIME_SECS - OAUTH_TOKEN_MARGIN_SECS
            }
            _ => false,
        }
    }

    /// Builds the `Authorization` header value for a request.
    ///
    /// `params` are the query or form parameters of the request; they are part
    /// of the signature but not of the header.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
    ) -> AppResult<String> {
        let oauth_params = self.oauth_params(&nonce(), chrono::Utc::now().timestamp(), &[]);
        self.header_from(method, url, params, oauth_params)
    }

    fn header_from(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        mut oauth_params: Vec<(String, String)>,
    ) -> AppResult<String> {
        let signature = self.signature(method, url, params, &oauth_params)?;
        oauth_params.push(("oauth_signature".to_string(), signature));

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth realm=\"{OAUTH_REALM}\", {fields}"))
    }

    fn oauth_params(
        &self,
        nonce: &str,
        timestamp: i64,
        extra: &[(&str, &str)],
    ) -> Vec<(String, String)> {
        let mut params = vec![
            (
                "oauth_consumer_key".to_string(),
                self.credentials.consumer_key.clone(),
            ),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
        ];
        if let Some(token) = &self.credentials.access_token {
            params.push(("oauth_token".to_string(), token.clone()));
        }
        params.push(("oauth_version".to_string(), "1.0".to_string()));
        params.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        params
    }

    /// Computes the HMAC-SHA1 signature of a request.
    pub(crate) fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        oauth_params: &[(String, String)],
    ) -> AppResult<String> {
        let mut url = Url::parse(url)?;
        let mut all: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (encode(&k), encode(&v)))
            .collect();
        url.set_query(None);
        url.set_fragment(None);

        all.extend(
            params
                .iter()
                .chain(oauth_params)
                .map(|(k, v)| (encode(k), encode(v))),
        );
        all.sort();

        let param_string = all
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(url.as_str()),
            encode(&param_string)
        );

        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(
                self.credentials
                    .access_token_secret
                    .as_deref()
                    .unwrap_or_default()
            )
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|e| AppError::OAuthError(format!("Invalid signing key: {e}")))?;
        mac.update(base_string.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Exchanges the session handle for a fresh access token.
    ///
    /// # Errors
    ///
    /// Returns `OAuthError` when no session handle or token is stored, the
    /// endpoint answers with a non-success status, or the answer lacks a token.
    pub async fn refresh_token(
        &mut self,
        client: &reqwest::Client,
        token_url: &str,
    ) -> AppResult<()> {
        let session_handle = self.credentials.session_handle.clone().ok_or_else(|| {
            AppError::OAuthError("No session handle stored; authorize the application first".into())
        })?;
        if self.credentials.access_token.is_none() {
            return Err(AppError::OAuthError(
                "No access token stored; authorize the application first".into(),
            ));
        }

        let oauth_params = self.oauth_params(
            &nonce(),
            chrono::Utc::now().timestamp(),
            &[("oauth_session_handle", session_handle.as_str())],
        );
        let header = self.header_from("POST", token_url, &[], oauth_params)?;

        let response = client
            .post(token_url)
            .header(reqwest::header::AUTHORIZATION, header)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::OAuthError(format!(
                "HTTP {}: token refresh rejected: {body}",
                status.as_u16()
            )));
        }

        self.apply_token_response(&body, chrono::Utc::now().timestamp())?;
        info!("OAuth access token refreshed");
        self.save()
    }

    pub(crate) fn apply_token_response(&mut self, body: &str, now: i64) -> AppResult<()> {
        let fields: HashMap<String, String> = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();

        let token = fields
            .get("oauth_token")
            .ok_or_else(|| AppError::OAuthError("Token response lacks oauth_token".into()))?;
        let secret = fields.get("oauth_token_secret").ok_or_else(|| {
            AppError::OAuthError("Token response lacks oauth_token_secret".into())
        })?;

        self.credentials.access_token = Some(token.clone());
        self.credentials.access_token_secret = Some(secret.clone());
        if let Some(handle) = fields.get("oauth_session_handle") {
            self.credentials.session_handle = Some(handle.clone());
        }
        if let Some(guid) = fields.get("xoauth_yahoo_guid") {
            self.credentials.guid = Some(guid.clone());
        }
        self.credentials.token_time = Some(now);
        Ok(())
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, RFC3986).to_string()
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
