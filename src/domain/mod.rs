//! Domain aggregates exposed by the client management service layer.

pub mod client;
pub mod types;
