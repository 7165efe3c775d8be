use super::binder::{Binder, BinderKind};
use super::function::BinderFunction;
use super::xml::{ToXml, XmlWriter};
use crate::constants::TABLE_XMLNS;
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Who may query the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    #[default]
    Any,
    App,
    User,
}

impl SecurityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::App => "app",
            Self::User => "user",
        }
    }
}

/// An Open Data Table definition.
///
/// Holds at most one binder per [`BinderKind`] and one function per name.
/// Binders are written in insertion order, followed by functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    author: String,
    api_key_url: String,
    documentation_url: String,
    description: Option<String>,
    sample_queries: Vec<String>,
    security_level: SecurityLevel,
    https: bool,
    binders: Vec<Binder>,
    functions: Vec<BinderFunction>,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        api_key_url: impl Into<String>,
        documentation_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            api_key_url: api_key_url.into(),
            documentation_url: documentation_url.into(),
            description: None,
            sample_queries: Vec::new(),
            security_level: SecurityLevel::Any,
            https: false,
            binders: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn sample_queries<I, S>(mut self, queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sample_queries.extend(queries.into_iter().map(Into::into));
        self
    }

    pub fn security_level(mut self, level: SecurityLevel) -> Self {
        self.security_level = level;
        self
    }

    pub fn https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }

    pub fn with_binders<I>(mut self, binders: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = Binder>,
    {
        for binder in binders {
            self.add_binder(binder)?;
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binders(&self) -> &[Binder] {
        &self.binders
    }

    pub fn functions(&self) -> &[BinderFunction] {
        &self.functions
    }

    pub fn binder(&self, kind: BinderKind) -> Option<&Binder> {
        self.binders.iter().find(|b| b.kind() == kind)
    }

    pub fn binder_mut(&mut self, kind: BinderKind) -> Option<&mut Binder> {
        self.binders.iter_mut().find(|b| b.kind() == kind)
    }

    pub fn add_binder(&mut self, binder: Binder) -> AppResult<()> {
        if self.binder(binder.kind()).is_some() {
            return Err(AppError::DuplicateBinder(binder.kind().to_string()));
        }
        self.binders.push(binder);
        Ok(())
    }

    pub fn remove_binder(&mut self, kind: BinderKind) -> Option<Binder> {
        let position = self.binders.iter().position(|b| b.kind() == kind)?;
        Some(self.binders.remove(position))
    }

    pub fn add_function(&mut self, function: BinderFunction) -> AppResult<()> {
        if self.functions.iter().any(|f| f.name() == function.name()) {
            return Err(AppError::DuplicateFunction(function.name().to_string()));
        }
        self.functions.push(function);
        Ok(())
    }

    pub fn remove_function(&mut self, name: &str) -> Option<BinderFunction> {
        let position = self.functions.iter().position(|f| f.name() == name)?;
        Some(self.functions.remove(position))
    }

    /// Serializes the table into an XML document.
    pub fn to_xml(&self) -> AppResult<String> {
        let mut writer = XmlWriter::new();
        writer.declaration()?;
        self.write_xml(&mut writer)?;
        writer.finish()
    }

    /// Writes `<dir>/<name>.xml`, defaulting to the table name and the current directory.
    pub fn save(&self, name: Option<&str>, dir: Option<&Path>) -> AppResult<PathBuf> {
        let file_name = format!("{}.xml", name.unwrap_or(&self.name));
        let path = match dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::IoError(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        fs::write(&path, self.to_xml()?).map_err(|e| {
            AppError::IoError(format!("Failed to write {}: {e}", path.display()))
        })?;

        info!(
            table = %self.name,
            binders = self.binders.len(),
            functions = self.functions.len(),
            path = %path.display(),
            "Table definition saved"
        );
        Ok(path)
    }
}

impl ToXml for Table {
    fn write_xml(&self, writer: &mut XmlWriter) -> AppResult<()> {
        writer.start(
            "table",
            &[
                ("xmlns", TABLE_XMLNS.to_string()),
                ("securityLevel", self.security_level.as_str().to_string()),
                ("https", self.https.to_string()),
            ],
        )?;

        writer.start("meta", &[])?;
        let meta = [
            ("author", Some(&self.author)),
            ("description", self.description.as_ref()),
            ("documentationURL", Some(&self.documentation_url)),
            ("apiKeyURL", Some(&self.api_key_url)),
        ];
        for (element, value) in meta {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                writer.text_element(element, value)?;
            }
        }
        for query in &self.sample_queries {
            writer.text_element("sampleQuery", query)?;
        }
        writer.end("meta")?;

        writer.start("bindings", &[])?;
        for binder in &self.binders {
            binder.write_xml(writer)?;
        }
        for function in &self.functions {
            function.write_xml(writer)?;
        }
        writer.end("bindings")?;

        writer.end("table")
    }
}
