use crate::errors::{AppError, AppResult};
use regex::Regex;
use std::sync::OnceLock;

/// Matches YQL variables such as `@woeid`, which are never quoted.
static VARIABLE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Right-hand side of a WHERE condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// No operand, e.g. `field is null`
    None,
    /// A literal or `@variable`
    Scalar(String),
    /// A list of literals for `in` / `not in`
    List(Vec<String>),
    /// A nested select for `in` / `not in`
    SubQuery(String),
}

/// A single `field operator operand` condition of a WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    field: String,
    operator: String,
    operand: Operand,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            operand: Operand::Scalar(value.into()),
        }
    }

    /// `field = 'value'`
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, "=", value)
    }

    /// A condition without operand, such as `field is null`.
    pub fn unary(field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            operand: Operand::None,
        }
    }

    /// `field in ('a','b')`
    pub fn is_in<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            operator: "in".to_string(),
            operand: Operand::List(values.into_iter().map(Into::into).collect()),
        }
    }

    /// `field in (select ...)`
    pub fn in_subquery(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: "in".to_string(),
            operand: Operand::SubQuery(query.into()),
        }
    }

    /// Replaces the operator, e.g. to turn `in` into `not in`.
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    fn is_membership(&self) -> bool {
        self.operator
            .split_whitespace()
            .last()
            .map(|op| op.eq_ignore_ascii_case("in"))
            .unwrap_or(false)
    }

    /// Renders the condition as YQL.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` when a membership operator (`in`, `not in`) gets a
    /// scalar operand, or a list operand is used with any other operator.
    pub fn render(&self) -> AppResult<String> {
        let field = &self.field;
        let op = &self.operator;
        match &self.operand {
            Operand::None => Ok(format!("{field} {op}")),
            Operand::List(values) => {
                if !self.is_membership() {
                    return Err(AppError::QueryError(format!(
                        "List operand requires an 'in' operator, got '{op}' for '{field}'"
                    )));
                }
                if values.is_empty() {
                    return Err(AppError::QueryError(format!(
                        "Empty value list for '{field} {op}'"
                    )));
                }
                let joined = values
                    .iter()
                    .map(|v| quote(v))
                    .collect::<Vec<_>>()
                    .join(",");
                Ok(format!("{field} {op} ({joined})"))
            }
            Operand::SubQuery(query) => {
                if !self.is_membership() {
                    return Err(AppError::QueryError(format!(
                        "Sub-select requires an 'in' operator, got '{op}' for '{field}'"
                    )));
                }
                Ok(format!("{field} {op} ({query})"))
            }
            Operand::Scalar(value) => {
                if self.is_membership() {
                    return Err(AppError::QueryError(format!(
                        "'{field} {op}' expects a list or a sub-select, got '{value}'"
                    )));
                }
                if is_variable(value) {
                    Ok(format!("{field} {op} {value}"))
                } else {
                    Ok(format!("{field} {op} {}", quote(value)))
                }
            }
        }
    }
}

fn is_variable(value: &str) -> bool {
    let regex = VARIABLE_REGEX.get_or_init(|| {
        Regex::new(r"^@\w+$").expect("VARIABLE_REGEX is a valid regex pattern")
    });
    regex.is_match(value)
}

/// Wraps a literal in single quotes, escaping backslashes and embedded quotes.
pub(crate) fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Joins conditions into a WHERE clause body.
pub(crate) fn render_all(conditions: &[Condition]) -> AppResult<String> {
    let rendered = conditions
        .iter()
        .map(Condition::render)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(rendered.join(" AND "))
}
