//! YQL statement building.
//!
//! Statements are plain values: build a [`Select`], [`Insert`], [`Update`] or
//! [`Delete`], then render it or hand it to [`crate::client::Yql::execute`].

mod condition;
mod filters;
mod statement;

// Re-export public API
pub use condition::{Condition, Operand};
pub use filters::{FuncFilter, RemoteFilter};
pub use statement::{Delete, Insert, Select, Statement, Update};
