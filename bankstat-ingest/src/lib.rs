//! bankstat-ingest: strict CSV statement parsing into typed transactions.

pub mod error;
pub mod statement;

pub use error::ParseError;
pub use statement::{parse_statement, parse_statement_path, parse_statement_str};
