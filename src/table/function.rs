use super::binder::read_function_file;
use super::input::{add_unique, remove_by_id, write_inputs, Input};
use super::xml::{ToXml, XmlWriter};
use crate::constants::DEFAULT_FUNCTION_TYPE;
use crate::errors::AppResult;
use std::path::Path;

/// A named `<function>` binding holding reusable JavaScript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderFunction {
    name: String,
    function_type: String,
    inputs: Vec<Input>,
    execute: Option<String>,
}

impl BinderFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function_type: DEFAULT_FUNCTION_TYPE.to_string(),
            inputs: Vec::new(),
            execute: None,
        }
    }

    pub fn function_type(mut self, function_type: impl Into<String>) -> Self {
        self.function_type = function_type.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.execute = Some(code.into());
        self
    }

    pub fn from_file(name: impl Into<String>, path: &Path) -> AppResult<Self> {
        Ok(Self::new(name).with_code(read_function_file(path)?))
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

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> Option<&str> {
        self.execute.as_deref()
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn add_input(&mut self, input: Input) -> AppResult<()> {
        add_unique(&mut self.inputs, input)
    }

    pub fn remove_input(&mut self, id: &str) -> Option<Input> {
        remove_by_id(&mut self.inputs, id)
    }

    pub fn add_function_from_file(&mut self, path: &Path) -> AppResult<()> {
        self.execute = Some(read_function_file(path)?);
        Ok(())
    }
}

impl ToXml for BinderFunction {
    fn write_xml(&self, writer: &mut XmlWriter) -> AppResult<()> {
        writer.start(
            "function",
            &[
                ("name", self.name.clone()),
                ("type", self.function_type.clone()),
            ],
        )?;
        write_inputs(writer, &self.inputs)?;
        if let Some(code) = &self.execute {
            writer.cdata_element("execute", code)?;
        }
        writer.end("function")
    }
}
