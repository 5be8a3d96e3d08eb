//! HTTP request handlers for the maintenance API.
//!
//! - `common` - Shared response envelope, query structs, and error mapping
//! - `maintenance` - Maintenance window endpoints

pub mod common;
pub mod maintenance;

pub use maintenance::*;
