//! sehati-storage
//!
//! Record store gateway. A narrow insert/select/update/delete interface over
//! the hosted relational store, plus typed helpers on top of it.

pub mod error;
pub mod filter;
pub mod memory;
pub mod records;
pub mod rest;
pub mod store;

pub use filter::{Filter, Order};
pub use store::RecordStore;
