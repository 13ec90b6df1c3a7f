//! Business operations on clients, independent of the HTTP layer.

pub mod client;
pub mod errors;

pub use errors::{ServiceError, ServiceResult};
