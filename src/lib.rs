//! A thin, synchronous client for the OpenTSDB `/api/query` HTTP API.
//!
//! The crate does three things, composed linearly: [`Client`] builds the
//! query URL and runs a blocking GET, [`Response`] decodes the JSON body
//! into [`Series`] values, and [`DataFrame`] lines the series up into a
//! small labeled table with one column per series.
//!
//! ```no_run
//! use otsdb::{AliasTransform, Client, QueryOutcome, QueryParams};
//!
//! fn main() -> otsdb::Result<()> {
//!     let client = Client::new("localhost", 4242, false);
//!     let params = QueryParams::new("1h-ago", "sys.cpu").tag("dc", "nyc");
//!
//!     match client.query(&params)? {
//!         QueryOutcome::Series(resp) => {
//!             let alias = AliasTransform::template("{tags.host}");
//!             print!("{}", resp.dataframe(Some(&alias))?);
//!         }
//!         QueryOutcome::Failed { status, body } => {
//!             eprintln!("query failed with {}: {}", status, body);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod frame;
pub mod model;
pub mod response;

pub use client::{Client, QueryOutcome, QueryParams};
pub use error::{Error, Result};
pub use frame::DataFrame;
pub use model::{AliasFn, AliasTransform, SampleValue, Series, Tags, Timestamp};
pub use response::Response;
