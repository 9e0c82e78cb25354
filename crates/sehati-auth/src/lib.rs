//! sehati-auth
//!
//! Server-validated sessions: password login against the users table and
//! short-lived signed session tokens checked on every request.

pub mod error;
pub mod flows;
pub mod password;
pub mod session;
