use super::condition::quote;
use std::fmt;

/// Paging applied by the remote table itself: `table(count)` or `table(offset,count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteFilter {
    pub offset: Option<u32>,
    pub count: u32,
}

impl RemoteFilter {
    pub fn count(count: u32) -> Self {
        Self {
            offset: None,
            count,
        }
    }

    pub fn range(offset: u32, count: u32) -> Self {
        Self {
            offset: Some(offset),
            count,
        }
    }
}

impl fmt::Display for RemoteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "({offset},{})", self.count),
            None => write!(f, "({})", self.count),
        }
    }
}

/// Post-query function applied by YQL after the remote call (`| sort(...)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuncFilter {
    Reverse,
    Sort { field: String, descending: bool },
    Tail(u32),
    Truncate(u32),
    Unique { field: String, hide_repeat_count: bool },
    Sanitize { field: Option<String> },
    /// Any other function, rendered as `name(key='value',...)`
    Custom { name: String, args: Vec<(String, String)> },
}

impl fmt::Display for FuncFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reverse => f.write_str("reverse()"),
            Self::Sort { field, descending } => {
                write!(f, "sort(field={}, descending='{descending}')", quote(field))
            }
            Self::Tail(count) => write!(f, "tail(count={count})"),
            Self::Truncate(count) => write!(f, "truncate(count={count})"),
            Self::Unique {
                field,
                hide_repeat_count,
            } => write!(
                f,
                "unique(field={}, hideRepeatCount='{hide_repeat_count}')",
                quote(field)
            ),
            Self::Sanitize { field: Some(field) } => write!(f, "sanitize(field={})", quote(field)),
            Self::Sanitize { field: None } => f.write_str("sanitize()"),
            Self::Custom { name, args } => {
                let args = args
                    .iter()
                    .map(|(k, v)| format!("{k}={}", quote(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{name}({args})")
            }
        }
    }
}
