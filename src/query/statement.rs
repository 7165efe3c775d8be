use super::condition::{quote, render_all, Condition};
use super::filters::{FuncFilter, RemoteFilter};
use crate::errors::{AppError, AppResult};

/// A `SELECT` statement.
///
/// Rendered as
/// `SELECT items FROM table(remote) WHERE c1 AND c2 LIMIT n OFFSET m | f1 | f2`,
/// with every part after the table name optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    table: String,
    items: Vec<String>,
    remote_filter: Option<RemoteFilter>,
    conditions: Vec<Condition>,
    limit: Option<u32>,
    offset: Option<u32>,
    func_filters: Vec<FuncFilter>,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            items: Vec::new(),
            remote_filter: None,
            conditions: Vec::new(),
            limit: None,
            offset: None,
            func_filters: Vec::new(),
        }
    }

    /// Columns to return; an empty list selects `*`.
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn remote_filter(mut self, filter: RemoteFilter) -> Self {
        self.remote_filter = Some(filter);
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn func_filter(mut self, filter: FuncFilter) -> Self {
        self.func_filters.push(filter);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn render(&self) -> AppResult<String> {
        if self.table.trim().is_empty() {
            return Err(AppError::QueryError("No table selected".into()));
        }

        let items = if self.items.is_empty() {
            "*".to_string()
        } else {
            self.items.join(",")
        };

        let mut query = format!("SELECT {items} FROM {}", self.table);
        if let Some(remote) = &self.remote_filter {
            query.push_str(&remote.to_string());
        }
        push_where(&mut query, &self.conditions)?;
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            query.push_str(&format!(" OFFSET {offset}"));
        }
        for filter in &self.func_filters {
            query.push_str(&format!(" | {filter}"));
        }
        Ok(query)
    }
}

/// An `INSERT INTO` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    table: String,
    items: Vec<String>,
    values: Vec<String>,
}

impl Insert {
    pub fn new<I, V, S, T>(table: impl Into<String>, items: I, values: V) -> Self
    where
        I: IntoIterator<Item = S>,
        V: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            table: table.into(),
            items: items.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn render(&self) -> AppResult<String> {
        check_pairs(&self.table, &self.items, &self.values)?;
        let values = self
            .values
            .iter()
            .map(|v| quote(v))
            .collect::<Vec<_>>()
            .join(",");
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({values})",
            self.table,
            self.items.join(",")
        ))
    }
}

/// An `UPDATE ... SET` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    table: String,
    items: Vec<String>,
    values: Vec<String>,
    conditions: Vec<Condition>,
}

impl Update {
    pub fn new<I, V, S, T>(table: impl Into<String>, items: I, values: V) -> Self
    where
        I: IntoIterator<Item = S>,
        V: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            table: table.into(),
            items: items.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
            conditions: Vec::new(),
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn render(&self) -> AppResult<String> {
        check_pairs(&self.table, &self.items, &self.values)?;
        let assignments = self
            .items
            .iter()
            .zip(&self.values)
            .map(|(item, value)| format!("{item}={}", quote(value)))
            .collect::<Vec<_>>()
            .join(",");
        let mut query = format!("UPDATE {} SET {assignments}", self.table);
        push_where(&mut query, &self.conditions)?;
        Ok(query)
    }
}

/// A `DELETE FROM` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delete {
    table: String,
    conditions: Vec<Condition>,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn render(&self) -> AppResult<String> {
        if self.table.trim().is_empty() {
            return Err(AppError::QueryError("No table selected".into()));
        }
        let mut query = format!("DELETE FROM {}", self.table);
        push_where(&mut query, &self.conditions)?;
        Ok(query)
    }
}

/// Any statement the client can send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Desc(String),
    ShowTables,
    /// A hand-written query, sent as-is
    Raw(String),
}

impl Statement {
    pub fn render(&self) -> AppResult<String> {
        match self {
            Self::Select(s) => s.render(),
            Self::Insert(s) => s.render(),
            Self::Update(s) => s.render(),
            Self::Delete(s) => s.render(),
            Self::Desc(table) => Ok(format!("desc {table}")),
            Self::ShowTables => Ok("SHOW TABLES".to_string()),
            Self::Raw(query) => Ok(query.clone()),
        }
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}

fn push_where(query: &mut String, conditions: &[Condition]) -> AppResult<()> {
    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&render_all(conditions)?);
    }
    Ok(())
}

fn check_pairs(table: &str, items: &[String], values: &[String]) -> AppResult<()> {
    if table.trim().is_empty() {
        return Err(AppError::QueryError("No table selected".into()));
    }
    if items.is_empty() {
        return Err(AppError::QueryError(format!("No items given for {table}")));
    }
    if items.len() != values.len() {
        return Err(AppError::QueryError(format!(
            "{} items but {} values for {table}",
            items.len(),
            values.len()
        )));
    }
    Ok(())
}
