//! TOML descriptions of Open Data Tables.
//!
//! ```toml
//! name = "mytable"
//! author = "josuebrunel"
//! api_key_url = "http://josuebrunel.org/api"
//! documentation_url = "http://josuebrunel.org/doc.html"
//! sample_queries = ["SELECT * FROM mytable"]
//!
//! [[binders]]
//! kind = "select"
//! item_path = "products.product"
//! produces = "xml"
//! urls = ["http://josuebrunel.org/service/v1"]
//! execute_file = "select.js"
//!
//! [[binders.inputs]]
//! id = "artist"
//! type = "xs:string"
//! param_type = "path"
//!
//! [binders.paging]
//! model = "page"
//! start = { id = "ItemPage", default = "1" }
//! page_size = { id = "Count", max = "25" }
//! ```

use super::binder::{read_function_file, Binder, BinderKind};
use super::definition::{SecurityLevel, Table};
use super::function::BinderFunction;
use super::input::{Input, InputKind, ParamType};
use super::paging::{Paging, PagingField};
use crate::errors::{AppError, AppResult};
use crate::models::ResponseFormat;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDescriptor {
    name: String,
    author: String,
    api_key_url: String,
    documentation_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    sample_queries: Vec<String>,
    #[serde(default)]
    security_level: SecurityLevel,
    #[serde(default)]
    https: bool,
    #[serde(default)]
    binders: Vec<BinderDescriptor>,
    #[serde(default)]
    functions: Vec<FunctionDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BinderDescriptor {
    kind: BinderKind,
    item_path: String,
    #[serde(default)]
    produces: ResponseFormat,
    #[serde(default)]
    polling_frequency_seconds: Option<u32>,
    #[serde(default)]
    urls: Vec<String>,
    #[serde(default)]
    inputs: Vec<InputDescriptor>,
    #[serde(default)]
    paging: Option<PagingDescriptor>,
    #[serde(default)]
    execute: Option<String>,
    #[serde(default)]
    execute_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionDescriptor {
    name: String,
    #[serde(default, rename = "type")]
    function_type: Option<String>,
    #[serde(default)]
    inputs: Vec<InputDescriptor>,
    #[serde(default)]
    execute: Option<String>,
    #[serde(default)]
    execute_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputDescriptor {
    #[serde(default)]
    kind: InputKind,
    id: String,
    #[serde(rename = "type")]
    data_type: String,
    param_type: ParamType,
    #[serde(default)]
    required: bool,
    #[serde(default, rename = "as")]
    alias: Option<String>,
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default, rename = "const")]
    constant: bool,
    #[serde(default)]
    batchable: bool,
    #[serde(default)]
    max_batch_items: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase", deny_unknown_fields)]
enum PagingDescriptor {
    Page {
        #[serde(default)]
        start: PagingField,
        #[serde(default)]
        page_size: PagingField,
        #[serde(default)]
        total: PagingField,
    },
    Offset {
        #[serde(default)]
        matrix: bool,
        #[serde(default)]
        start: PagingField,
        #[serde(default)]
        page_size: PagingField,
        #[serde(default)]
        total: PagingField,
    },
    Url {
        next_page: String,
    },
}

/// Loads a table from a TOML descriptor file.
///
/// Relative `execute_file` paths are resolved against the descriptor's directory.
///
/// # Errors
///
/// Returns `InvalidInput` if the TOML is malformed, has unknown keys or a
/// binding sets both `execute` and `execute_file`; `DuplicateBinder`,
/// `DuplicateFunction` or `DuplicateInput` for repeated keys; `IoError` if a
/// file cannot be read.
pub fn load_table(path: &Path) -> AppResult<Table> {
    let contents = fs::read_to_string(path).map_err(|e| {
        AppError::IoError(format!("Failed to read descriptor {}: {e}", path.display()))
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_table(&contents, base_dir)
}

/// Parses a TOML descriptor; `base_dir` anchors relative `execute_file` paths.
pub fn parse_table(contents: &str, base_dir: &Path) -> AppResult<Table> {
    let descriptor: TableDescriptor = toml::from_str(contents)
        .map_err(|e| AppError::InvalidInput(format!("Failed to parse table descriptor: {e}")))?;

    let mut table = Table::new(
        descriptor.name,
        descriptor.author,
        descriptor.api_key_url,
        descriptor.documentation_url,
    )
    .sample_queries(descriptor.sample_queries)
    .security_level(descriptor.security_level)
    .https(descriptor.https);
    if let Some(description) = descriptor.description {
        table = table.description(description);
    }

    for binder in descriptor.binders {
        table.add_binder(binder.into_binder(base_dir)?)?;
    }
    for function in descriptor.functions {
        table.add_function(function.into_function(base_dir)?)?;
    }
    Ok(table)
}

impl BinderDescriptor {
    fn into_binder(self, base_dir: &Path) -> AppResult<Binder> {
        let mut binder = Binder::new(self.kind, self.item_path, self.produces)
            .with_urls(self.urls)
            .with_inputs(self.inputs.into_iter().map(InputDescriptor::into_input))?;
        if let Some(seconds) = self.polling_frequency_seconds {
            binder = binder.polling_frequency(seconds);
        }
        if let Some(paging) = self.paging {
            binder = binder.with_paging(paging.into_paging());
        }
        let context = format!("binder '{}'", self.kind);
        if let Some(code) = function_body(&context, self.execute, self.execute_file, base_dir)? {
            binder.add_function(code);
        }
        Ok(binder)
    }
}

impl FunctionDescriptor {
    fn into_function(self, base_dir: &Path) -> AppResult<BinderFunction> {
        let context = format!("function '{}'", self.name);
        let mut function = BinderFunction::new(self.name)
            .with_inputs(self.inputs.into_iter().map(InputDescriptor::into_input))?;
        if let Some(function_type) = self.function_type {
            function = function.function_type(function_type);
        }
        if let Some(code) = function_body(&context, self.execute, self.execute_file, base_dir)? {
            function = function.with_code(code);
        }
        Ok(function)
    }
}

impl InputDescriptor {
    fn into_input(self) -> Input {
        let mut input = Input::new(self.kind, self.id, self.data_type, self.param_type)
            .required(self.required)
            .private(self.private)
            .constant(self.constant)
            .batchable(self.batchable);
        if let Some(alias) = self.alias {
            input = input.alias(alias);
        }
        if let Some(default) = self.default {
            input = input.default_value(default);
        }
        if let Some(max) = self.max_batch_items {
            input = input.max_batch_items(max);
        }
        input
    }
}

impl PagingDescriptor {
    fn into_paging(self) -> Paging {
        match self {
            Self::Page {
                start,
                page_size,
                total,
            } => Paging::page(start, page_size, total),
            Self::Offset {
                matrix,
                start,
                page_size,
                total,
            } => Paging::offset(matrix, start, page_size, total),
            Self::Url { next_page } => Paging::url(next_page),
        }
    }
}

fn function_body(
    context: &str,
    code: Option<String>,
    file: Option<PathBuf>,
    base_dir: &Path,
) -> AppResult<Option<String>> {
    match (code, file) {
        (Some(_), Some(_)) => Err(AppError::InvalidInput(format!(
            "{context} sets both execute and execute_file"
        ))),
        (Some(code), None) => Ok(Some(code)),
        (None, Some(file)) => {
            let path = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            read_function_file(&path).map(Some)
        }
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        name = "mytest"
        author = "josuebrunel"
        api_key_url = "http://josuebrunel.org/api"
        documentation_url = "http://josuebrunel.org/doc.html"
    "#;

    #[test]
    fn minimal_descriptor() {
        let table = parse_table(MINIMAL, Path::new(".")).unwrap();
        assert_eq!(table.name(), "mytest");
        assert!(table.binders().is_empty());
    }

    #[test]
    fn binder_with_inputs_and_paging() {
        let toml = format!(
            r#"{MINIMAL}
            [[binders]]
            kind = "select"
            item_path = "products.product"
            produces = "xml"
            execute = "response.object = 1;"

            [[binders.inputs]]
            id = "artist"
            type = "xs:string"
            param_type = "path"
            required = true

            [binders.paging]
            model = "offset"
            matrix = true
            start = {{ id = "ItemPage", default = "1" }}
            "#
        );
        let table = parse_table(&toml, Path::new(".")).unwrap();
        let binder = table.binder(BinderKind::Select).unwrap();
        assert_eq!(binder.inputs().len(), 1);
        assert!(binder.inputs()[0].is_required());
        assert_eq!(binder.paging().map(|p| p.model()), Some("offset"));
        assert_eq!(binder.function(), Some("response.object = 1;"));
    }

    #[test]
    fn unknown_key_errors() {
        let toml = format!("{MINIMAL}\nextra = 1\n");
        assert!(parse_table(&toml, Path::new(".")).is_err());
    }

    #[test]
    fn misspelled_paging_key_errors() {
        let toml = format!(
            r#"{MINIMAL}
            [[binders]]
            kind = "select"
            item_path = "products.product"

            [binders.paging]
            model = "page"
            pagesize = {{ id = "Count", max = "25" }}
            "#
        );
        let err = parse_table(&toml, Path::new(".")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn function_body_and_type() {
        let toml = format!(
            r#"{MINIMAL}
            [[functions]]
            name = "concat"
            type = "reduce"
            execute = "response.object = a + b;"
            "#
        );
        let table = parse_table(&toml, Path::new(".")).unwrap();
        let function = &table.functions()[0];
        assert_eq!(function.code(), Some("response.object = a + b;"));
        assert!(table.to_xml().unwrap().contains("<function name=\"concat\" type=\"reduce\">"));
    }

    #[test]
    fn execute_and_execute_file_conflict() {
        let toml = format!(
            r#"{MINIMAL}
            [[functions]]
            name = "concat"
            execute = "x"
            execute_file = "x.js"
            "#
        );
        let err = parse_table(&toml, Path::new(".")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_binders_error() {
        let toml = format!(
            r#"{MINIMAL}
            [[binders]]
            kind = "select"
            item_path = "a"

            [[binders]]
            kind = "select"
            item_path = "b"
            "#
        );
        let err = parse_table(&toml, Path::new(".")).unwrap_err();
        assert!(matches!(err, AppError::DuplicateBinder(_)));
    }
}
