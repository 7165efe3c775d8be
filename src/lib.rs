//! myql library
//!
//! A client for the Yahoo Query Language (YQL) and a builder for the Open Data
//! Table XML documents YQL loads with `USE`. The `myql` binary is a thin
//! command-line layer over these modules.
//!
//! ## Overview
//!
//! - [`query`] - Builds `SELECT`/`INSERT`/`UPDATE`/`DELETE` statements and their WHERE clauses
//! - [`client`] - Sends statements to the public or OAuth-signed YQL endpoint
//! - [`contrib`] - Canned weather and finance queries
//! - [`table`] - Open Data Table definitions, their XML form and TOML descriptors
//! - [`config`] - Client configuration loaded from TOML
//! - [`cli`] - Command-line interface
//! - [`models`] - Response format and temperature unit
//! - [`errors`] - Error types used throughout the crate
//!
//! ## Example Usage
//!
//! ```no_run
//! use myql::client::Yql;
//! use myql::config::ClientConfig;
//! use myql::errors::AppResult;
//! use myql::query::Condition;
//!
//! # async fn example() -> AppResult<()> {
//! let yql = Yql::new(ClientConfig::default())?;
//! let response = yql
//!     .select("geo.countries", &["name", "code"])
//!     .filter(Condition::equals("place", "North America"))
//!     .limit(5)
//!     .send()
//!     .await?;
//! println!("{}", response.pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! Building a table definition:
//!
//! ```
//! use myql::models::ResponseFormat;
//! use myql::table::{Binder, BinderKind, Input, ParamType, Table};
//!
//! let mut binder = Binder::new(BinderKind::Select, "products.product", ResponseFormat::Xml);
//! binder.add_url("http://josuebrunel.org/service/v1");
//! binder.add_input(Input::key("artist", "xs:string", ParamType::Path)).unwrap();
//!
//! let mut table = Table::new(
//!     "mytable",
//!     "josuebrunel",
//!     "http://josuebrunel.org/api",
//!     "http://josuebrunel.org/doc.html",
//! );
//! table.add_binder(binder).unwrap();
//! assert!(table.to_xml().unwrap().contains("<url>http://josuebrunel.org/service/v1</url>"));
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod contrib;
pub mod errors;
pub mod models;
pub mod query;
pub mod table;
pub mod utils;
