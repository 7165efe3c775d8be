use super::input::{add_unique, remove_by_id, write_inputs, Input};
use super::paging::Paging;
use super::xml::{ToXml, XmlWriter};
use crate::constants::DEFAULT_POLLING_FREQUENCY_SECONDS;
use crate::errors::{AppError, AppResult};
use crate::models::ResponseFormat;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Operation a binder maps onto the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinderKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl BinderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for BinderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "select" => Ok(Self::Select),
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(AppError::InvalidInput(format!(
                "Unknown binder '{other}', expected select, insert, update or delete"
            ))),
        }
    }
}

/// A select/insert/update/delete binding of an Open Data Table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binder {
    kind: BinderKind,
    item_path: String,
    produces: ResponseFormat,
    polling_frequency_seconds: u32,
    urls: Vec<String>,
    inputs: Vec<Input>,
    paging: Option<Paging>,
    execute: Option<String>,
}

impl Binder {
    pub fn new(kind: BinderKind, item_path: impl Into<String>, produces: ResponseFormat) -> Self {
        Self {
            kind,
            item_path: item_path.into(),
            produces,
            polling_frequency_seconds: DEFAULT_POLLING_FREQUENCY_SECONDS,
            urls: Vec::new(),
            inputs: Vec::new(),
            paging: None,
            execute: None,
        }
    }

    pub fn polling_frequency(mut self, seconds: u32) -> Self {
        self.polling_frequency_seconds = seconds;
        self
    }

    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls.extend(urls.into_iter().map(Into::into));
        self
    }

    pub fn with_inputs<I>(mut self, inputs: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = Input>,
    {
        for input in inputs {
            self.add_input(input)?;
        }
        Ok(self)
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }

    pub fn kind(&self) -> BinderKind {
        self.kind
    }

    pub fn item_path(&self) -> &str {
        &self.item_path
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn paging(&self) -> Option<&Paging> {
        self.paging.as_ref()
    }

    pub fn function(&self) -> Option<&str> {
        self.execute.as_deref()
    }

    pub fn add_input(&mut self, input: Input) -> AppResult<()> {
        add_unique(&mut self.inputs, input)
    }

    pub fn remove_input(&mut self, id: &str) -> Option<Input> {
        remove_by_id(&mut self.inputs, id)
    }

    /// Sets the JavaScript body run by YQL instead of a plain URL call.
    pub fn add_function(&mut self, code: impl Into<String>) {
        self.execute = Some(code.into());
    }

    pub fn add_function_from_file(&mut self, path: &Path) -> AppResult<()> {
        self.execute = Some(read_function_file(path)?);
        Ok(())
    }

    pub fn remove_function(&mut self) -> Option<String> {
        self.execute.take()
    }

    /// Sets the paging strategy, returning the one it replaces.
    pub fn add_paging(&mut self, paging: Paging) -> Option<Paging> {
        self.paging.replace(paging)
    }

    pub fn remove_paging(&mut self) -> Option<Paging> {
        self.paging.take()
    }

    pub fn add_url(&mut self, url: impl Into<String>) {
        self.urls.push(url.into());
    }

    /// Removes every occurrence of `url`; returns whether anything was removed.
    pub fn remove_url(&mut self, url: &str) -> bool {
        let before = self.urls.len();
        self.urls.retain(|u| u != url);
        self.urls.len() != before
    }
}

impl ToXml for Binder {
    fn write_xml(&self, writer: &mut XmlWriter) -> AppResult<()> {
        let name = self.kind.as_str();
        writer.start(
            name,
            &[
                ("itemPath", self.item_path.clone()),
                ("produces", self.produces.to_string()),
                (
                    "pollingFrequencySeconds",
                    self.polling_frequency_seconds.to_string(),
                ),
            ],
        )?;

        if !self.urls.is_empty() {
            writer.start("urls", &[])?;
            for url in &self.urls {
                writer.text_element("url", url)?;
            }
            writer.end("urls")?;
        }
        if let Some(paging) = &self.paging {
            paging.write_xml(writer)?;
        }
        write_inputs(writer, &self.inputs)?;
        if let Some(code) = &self.execute {
            writer.cdata_element("execute", code)?;
        }

        writer.end(name)
    }
}

pub(crate) fn read_function_file(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|e| {
        AppError::IoError(format!(
            "Failed to read function body {}: {e}",
            path.display()
        ))
    })
}
