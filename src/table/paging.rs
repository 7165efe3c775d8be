use super::xml::{ToXml, XmlWriter};
use crate::errors::AppResult;
use serde::Deserialize;

/// Attributes of a `<start>`, `<pageSize>` or `<total>` paging element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagingField {
    pub id: Option<String>,
    pub default: Option<String>,
    pub max: Option<String>,
}

impl PagingField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        [("id", &self.id), ("default", &self.default), ("max", &self.max)]
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v.clone())))
            .collect()
    }

    fn write(&self, writer: &mut XmlWriter, name: &str) -> AppResult<()> {
        let attributes = self.attributes();
        if attributes.is_empty() {
            return Ok(());
        }
        writer.empty(name, &attributes)
    }
}

/// Paging strategy of a binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paging {
    /// Page number and page size
    Page {
        start: PagingField,
        page_size: PagingField,
        total: PagingField,
    },
    /// Item offset and count; `matrix` puts the parameters in matrix form
    Offset {
        matrix: bool,
        start: PagingField,
        page_size: PagingField,
        total: PagingField,
    },
    /// Next-page URL found at `next_page` in the response
    Url { next_page: String },
}

impl Paging {
    pub fn page(start: PagingField, page_size: PagingField, total: PagingField) -> Self {
        Self::Page {
            start,
            page_size,
            total,
        }
    }

    pub fn offset(
        matrix: bool,
        start: PagingField,
        page_size: PagingField,
        total: PagingField,
    ) -> Self {
        Self::Offset {
            matrix,
            start,
            page_size,
            total,
        }
    }

    pub fn url(next_page: impl Into<String>) -> Self {
        Self::Url {
            next_page: next_page.into(),
        }
    }

    pub fn model(&self) -> &'static str {
        match self {
            Self::Page { .. } => "page",
            Self::Offset { .. } => "offset",
            Self::Url { .. } => "url",
        }
    }
}

impl ToXml for Paging {
    fn write_xml(&self, writer: &mut XmlWriter) -> AppResult<()> {
        let mut attributes = vec![("model", self.model().to_string())];
        if let Self::Offset { matrix: true, .. } = self {
            attributes.push(("matrix", "true".to_string()));
        }
        writer.start("paging", &attributes)?;

        match self {
            Self::Page {
                start,
                page_size,
                total,
            }
            | Self::Offset {
                start,
                page_size,
                total,
                ..
            } => {
                start.write(writer, "start")?;
                page_size.write(writer, "pageSize")?;
                total.write(writer, "total")?;
            }
            Self::Url { next_page } => {
                writer.empty("nextpage", &[("path", next_page.clone())])?;
            }
        }

        writer.end("paging")
    }
}
