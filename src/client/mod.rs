//! YQL client.
//!
//! [`Yql`] turns [`crate::query`] statements into HTTP GET requests against
//! the YQL endpoints and returns the raw [`YqlResponse`]. Requests are
//! optionally signed with [`OAuth1`].

mod oauth;
mod response;
mod yql;

// Re-export public API
pub use oauth::{OAuth1, OAuthCredentials};
pub use response::YqlResponse;
pub use yql::{Prepared, UseTable, Yql};
