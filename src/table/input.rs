use super::xml::{ToXml, XmlWriter};
use crate::errors::{AppError, AppResult};
use serde::Deserialize;

/// Element name of an input: `<key>`, `<value>` or `<map>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[default]
    Key,
    Value,
    Map,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Value => "value",
            Self::Map => "map",
        }
    }
}

/// Where YQL places the input when calling the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Query,
    Matrix,
    Header,
    Path,
    Variable,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Matrix => "matrix",
            Self::Header => "header",
            Self::Path => "path",
            Self::Variable => "variable",
        }
    }
}

/// A single named parameter of a binder or function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    kind: InputKind,
    id: String,
    data_type: String,
    param_type: ParamType,
    required: bool,
    alias: Option<String>,
    default: Option<String>,
    private: bool,
    constant: bool,
    batchable: bool,
    max_batch_items: Option<u32>,
}

impl Input {
    pub fn new(
        kind: InputKind,
        id: impl Into<String>,
        data_type: impl Into<String>,
        param_type: ParamType,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            data_type: data_type.into(),
            param_type,
            required: false,
            alias: None,
            default: None,
            private: false,
            constant: false,
            batchable: false,
            max_batch_items: None,
        }
    }

    /// `<key id=".." type=".." paramType=".."/>`
    pub fn key(id: impl Into<String>, data_type: impl Into<String>, param_type: ParamType) -> Self {
        Self::new(InputKind::Key, id, data_type, param_type)
    }

    /// `<value .../>`, used by insert and update binders.
    pub fn value(id: impl Into<String>, data_type: impl Into<String>, param_type: ParamType) -> Self {
        Self::new(InputKind::Value, id, data_type, param_type)
    }

    /// `<map .../>`, a dynamic set of keys.
    pub fn map(id: impl Into<String>, data_type: impl Into<String>, param_type: ParamType) -> Self {
        Self::new(InputKind::Map, id, data_type, param_type)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Name the value goes by in the remote call (`as` attribute).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn constant(mut self, constant: bool) -> Self {
        self.constant = constant;
        self
    }

    pub fn batchable(mut self, batchable: bool) -> Self {
        self.batchable = batchable;
        self
    }

    pub fn max_batch_items(mut self, max: u32) -> Self {
        self.max_batch_items = Some(max);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("id", self.id.clone())];
        if let Some(alias) = &self.alias {
            attrs.push(("as", alias.clone()));
        }
        attrs.push(("type", self.data_type.clone()));
        attrs.push(("paramType", self.param_type.as_str().to_string()));
        attrs.push(("required", self.required.to_string()));
        if let Some(default) = &self.default {
            attrs.push(("default", default.clone()));
        }
        if self.private {
            attrs.push(("private", "true".to_string()));
        }
        if self.constant {
            attrs.push(("const", "true".to_string()));
        }
        if self.batchable {
            attrs.push(("batchable", "true".to_string()));
        }
        if let Some(max) = self.max_batch_items {
            attrs.push(("maxBatchItems", max.to_string()));
        }
        attrs
    }
}

impl ToXml for Input {
    fn write_xml(&self, writer: &mut XmlWriter) -> AppResult<()> {
        writer.empty(self.kind.as_str(), &self.attributes())
    }
}

/// Appends an input, rejecting a second input with the same id.
pub(crate) fn add_unique(inputs: &mut Vec<Input>, input: Input) -> AppResult<()> {
    if inputs.iter().any(|i| i.id == input.id) {
        return Err(AppError::DuplicateInput(input.id));
    }
    inputs.push(input);
    Ok(())
}

pub(crate) fn remove_by_id(inputs: &mut Vec<Input>, id: &str) -> Option<Input> {
    let position = inputs.iter().position(|i| i.id == id)?;
    Some(inputs.remove(position))
}

/// Writes `<inputs>...</inputs>`; nothing when the list is empty.
pub(crate) fn write_inputs(writer: &mut XmlWriter, inputs: &[Input]) -> AppResult<()> {
    if inputs.is_empty() {
        return Ok(());
    }
    writer.start("inputs", &[])?;
    for input in inputs {
        input.write_xml(writer)?;
    }
    writer.end("inputs")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &Input) -> String {
        let mut w = XmlWriter::new();
        input.write_xml(&mut w).unwrap();
        w.finish().unwrap()
    }

    #[test]
    fn key_with_defaults() {
        let key = Input::key("artist", "xs:string", ParamType::Path);
        assert_eq!(
            render(&key),
            r#"<key id="artist" type="xs:string" paramType="path" required="false"/>"#
        );
    }

    #[test]
    fn all_optional_attributes() {
        let key = Input::key("name", "xs:string", ParamType::Path)
            .required(true)
            .default_value("josh")
            .private(true)
            .max_batch_items(10);
        assert_eq!(
            render(&key),
            r#"<key id="name" type="xs:string" paramType="path" required="true" default="josh" private="true" maxBatchItems="10"/>"#
        );
    }

    #[test]
    fn value_input_with_alias() {
        let value = Input::value("content", "xs:string", ParamType::Variable)
            .required(true)
            .alias("body");
        assert_eq!(
            render(&value),
            r#"<value id="content" as="body" type="xs:string" paramType="variable" required="true"/>"#
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut inputs = Vec::new();
        add_unique(&mut inputs, Input::key("artist", "xs:string", ParamType::Path)).unwrap();
        let err = add_unique(&mut inputs, Input::value("artist", "xs:string", ParamType::Query))
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateInput(id) if id == "artist"));
        assert_eq!(inputs.len(), 1);
    }

    #[test]
    fn remove_by_id_returns_input() {
        let mut inputs = vec![
            Input::key("artist", "xs:string", ParamType::Path),
            Input::key("song", "xs:string", ParamType::Path),
        ];
        let removed = remove_by_id(&mut inputs, "artist").unwrap();
        assert_eq!(removed.id(), "artist");
        assert_eq!(inputs.len(), 1);
        assert!(remove_by_id(&mut inputs, "artist").is_none());
    }
}
