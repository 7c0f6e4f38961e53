//! Burrow DNS Domain Layer
pub mod config;
pub mod errors;
pub mod exchange;
pub mod query;
pub mod question;

pub use config::{CliOverrides, Config};
pub use errors::DomainError;
pub use exchange::{Exchange, ExchangeState};
pub use query::ClientQuery;
pub use question::{DnsQuestion, RecordClass, RecordType};
