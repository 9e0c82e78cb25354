//! sehati-core
//!
//! Pure domain records and table names. No store or transport dependency;
//! this is the shared vocabulary of the Sehati system.

pub mod error;
pub mod models;
pub mod tables;
