//! Database module
//!
//! SQLite storage for the submission slot backend.

pub mod init;

pub use init::{init_database, init_in_memory};
