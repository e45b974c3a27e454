//! # SWAT L2CAP
//!
//! Connection lifecycle management for the two L2CAP channels of the SWAT
//! audio relay protocol:
//!
//! - **Signalling**: low-traffic control path, infinite flush timeout
//! - **Media**: audio path, 25-30 ms local flush timeout
//!
//! The crate owns the per-device channel state machines. The L2CAP transport
//! below it is reached through the [`L2capTransport`] trait, and the SWAT
//! message codec above it is notified through [`SwatEvent`]s.
//!
//! ## Feature Flags
//!
//! - `runtime` (default): [`runtime::SwatService`], a tokio task owning the
//!   manager
//!
//! ## Modules
//!
//! - [`core`]: Identifiers, parameter tables, transport trait, errors
//! - [`registry`]: Per-device channel state
//! - [`channel`]: Signalling and media state machines
//! - [`dispatch`]: Transport event entry point
//! - [`runtime`]: Async driver (requires `runtime` feature)
//!
//! ## Example Usage
//!
//! ```rust
//! use swat_l2cap::prelude::*;
//!
//! struct Controller {
//!     next: u16,
//! }
//!
//! impl L2capTransport for Controller {
//!     fn reserve_multiplexer(
//!         &mut self,
//!         _kind: ChannelKind,
//!         psm: Psm,
//!     ) -> Result<Psm, ReservationError> {
//!         Ok(psm)
//!     }
//!
//!     fn connect(&mut self, _device: DeviceId, _psm: Psm, _table: &ParameterTable) -> ConnectionId {
//!         self.next += 1;
//!         ConnectionId(self.next)
//!     }
//!
//!     fn accept_connection(
//!         &mut self,
//!         _connection: ConnectionId,
//!         _transaction: TransactionId,
//!         _accept: bool,
//!         _table: &ParameterTable,
//!     ) {
//!     }
//!
//!     fn disconnect(&mut self, _connection: ConnectionId) {}
//! }
//!
//! let mut swat = SwatL2cap::register(SwatConfig::default(), Controller { next: 0 }).unwrap();
//!
//! swat.request_media_connect(DeviceId(42)).unwrap();
//! swat.handle_transport_event(TransportEvent::ConnectConfirm {
//!     connection: ConnectionId(1),
//!     outcome: ConnectOutcome::Success,
//! });
//!
//! assert_eq!(swat.media_state(DeviceId(42)), ChannelState::Connected);
//! assert_eq!(
//!     swat.poll_event(),
//!     Some(SwatEvent::MediaConnected {
//!         device: DeviceId(42),
//!         connection: ConnectionId(1),
//!     })
//! );
//!
//! // Cleanup paths can close unconditionally and learn whether to wait
//! assert!(swat.request_media_close(DeviceId(42)));
//! assert!(!swat.request_media_close(DeviceId(7)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core module (always included)
pub mod core;

pub mod channel;
pub mod config;
pub mod dispatch;
pub mod event;
pub mod registrar;
pub mod registry;

mod manager;
mod watchdog;

// Async driver (feature-gated)
#[cfg(feature = "runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub mod runtime;

#[cfg(test)]
mod mock;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;

    pub use crate::channel::{ChannelState, Initiator, PendingTransaction};
    pub use crate::config::{SwatConfig, SwatConfigBuilder};
    pub use crate::dispatch::{ConnectOutcome, TransportEvent};
    pub use crate::event::{DisconnectReason, SwatEvent};
    pub use crate::manager::SwatL2cap;
    pub use crate::registrar::RegisteredPsms;

    #[cfg(feature = "runtime")]
    pub use crate::runtime::{SwatHandle, SwatService};
}

// Re-export commonly used items at crate root
pub use crate::core::{
    ChannelKind, ConnectFailure, ConnectionId, DeviceId, L2capTransport, ParameterTable, Psm,
    ReservationError, SwatError, SwatResult, TransactionId,
};
pub use channel::ChannelState;
pub use config::SwatConfig;
pub use dispatch::{ConnectOutcome, TransportEvent};
pub use event::{DisconnectReason, SwatEvent};
pub use manager::SwatL2cap;
