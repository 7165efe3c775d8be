//! Open Data Table definitions.
//!
//! A [`Table`] groups binders (one per select/insert/update/delete) and named
//! JavaScript functions, and serializes them into the XML document YQL loads
//! with `USE`.

mod binder;
mod definition;
mod descriptor;
mod function;
mod input;
mod paging;
mod xml;

// Re-export public API
pub use binder::{Binder, BinderKind};
pub use definition::{SecurityLevel, Table};
pub use descriptor::{load_table, parse_table};
pub use function::BinderFunction;
pub use input::{Input, InputKind, ParamType};
pub use paging::{Paging, PagingField};
pub use xml::{ToXml, XmlWriter};
