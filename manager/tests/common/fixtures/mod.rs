//! Reusable test utilities:
//! - In-memory test database
//! - Common test data and builders

// Allow unused code in test fixtures - they are utilities shared by several
// test binaries and not every binary uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod test_data;
pub mod test_database;

pub use test_data::*;
pub use test_database::TestDatabase;
