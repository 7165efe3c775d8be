use crate::errors::{AppError, AppResult};
use crate::models::ResponseFormat;
use crate::utils::prettify;
use serde_json::Value;

/// Raw answer of a YQL call.
///
/// The body is kept as returned; helpers parse it on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YqlResponse {
    status: u16,
    body: String,
    format: ResponseFormat,
}

impl YqlResponse {
    pub fn new(status: u16, body: String, format: ResponseFormat) -> Self {
        Self {
            status,
            body,
            format,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> AppResult<Value> {
        if self.format != ResponseFormat::Json {
            return Err(AppError::ParseError(format!(
                "Response was requested as {}, not json",
                self.format
            )));
        }
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Returns the `query.results` node of a JSON response (`null` when YQL found nothing).
    pub fn results(&self) -> AppResult<Value> {
        let json = self.json()?;
        json.get("query")
            .and_then(|q| q.get("results"))
            .cloned()
            .ok_or_else(|| AppError::ParseError("Response has no query.results node".into()))
    }

    /// Returns the error description YQL puts in failed JSON responses.
    pub fn error_description(&self) -> Option<String> {
        let json = self.json().ok()?;
        json.get("error")?
            .get("description")?
            .as_str()
            .map(str::to_string)
    }

    /// Pretty-prints the body according to its format.
    pub fn pretty(&self) -> AppResult<String> {
        prettify(&self.body, self.format)
    }

    /// Turns a non-success status into an error.
    pub fn error_for_status(self) -> AppResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let detail = self
            .error_description()
            .unwrap_or_else(|| self.body.chars().take(200).collect());
        Err(AppError::NetworkError(format!(
            "HTTP {}: YQL request failed: {detail}",
            self.status
        )))
    }
}
