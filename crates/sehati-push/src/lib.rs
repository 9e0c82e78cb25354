//! sehati-push
//!
//! Push notification delivery: device registration, per-user fan-out
//! through a push transport, the persisted delivery ledger, and an
//! in-process event bus announcing completed dispatches.

pub mod bus;
pub mod devices;
pub mod dispatch;
pub mod error;
pub mod payload;
pub mod transport;

pub use dispatch::{DispatchEvent, DispatchReport, DispatchRequest, Dispatcher};
pub use transport::{DeliveryError, PushTransport};
