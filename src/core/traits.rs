//! Core traits for the SWAT channel manager.
//!
//! The link-layer transport is an external service; these traits are the
//! boundary the manager drives it through.

use super::error::ReservationError;
use super::params::ParameterTable;
use super::types::{ChannelKind, ConnectionId, DeviceId, Psm, TransactionId};

/// Requests the manager issues to the L2CAP transport.
///
/// Every call returns as soon as the request is queued. Completion is reported
/// later as a [`TransportEvent`](crate::dispatch::TransportEvent) fed to the
/// dispatcher.
///
/// # Example
///
/// ```ignore
/// struct Controller { /* ... */ }
///
/// impl L2capTransport for Controller {
///     fn reserve_multiplexer(&mut self, kind: ChannelKind, psm: Psm)
///         -> Result<Psm, ReservationError> { /* ... */ }
///
///     fn connect(&mut self, device: DeviceId, psm: Psm, table: &ParameterTable)
///         -> ConnectionId { self.send_connect_req(device, psm, &table.to_words()) }
///
///     fn accept_connection(&mut self, connection: ConnectionId,
///         transaction: TransactionId, accept: bool, table: &ParameterTable) { /* ... */ }
///
///     fn disconnect(&mut self, connection: ConnectionId) { /* ... */ }
/// }
/// ```
pub trait L2capTransport {
    /// Reserve `psm` for inbound connections on the `kind` channel.
    fn reserve_multiplexer(
        &mut self,
        kind: ChannelKind,
        psm: Psm,
    ) -> Result<Psm, ReservationError>;

    /// Start an outgoing connection.
    ///
    /// Returns the handle the transport will use for the pending connection.
    fn connect(&mut self, device: DeviceId, psm: Psm, table: &ParameterTable) -> ConnectionId;

    /// Answer an inbound connect indication.
    fn accept_connection(
        &mut self,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
        table: &ParameterTable,
    );

    /// Tear down a connection.
    fn disconnect(&mut self, connection: ConnectionId);
}

impl<T: L2capTransport + ?Sized> L2capTransport for Box<T> {
    fn reserve_multiplexer(
        &mut self,
        kind: ChannelKind,
        psm: Psm,
    ) -> Result<Psm, ReservationError> {
        (**self).reserve_multiplexer(kind, psm)
    }

    fn connect(&mut self, device: DeviceId, psm: Psm, table: &ParameterTable) -> ConnectionId {
        (**self).connect(device, psm, table)
    }

    fn accept_connection(
        &mut self,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
        table: &ParameterTable,
    ) {
        (**self).accept_connection(connection, transaction, accept, table)
    }

    fn disconnect(&mut self, connection: ConnectionId) {
        (**self).disconnect(connection)
    }
}
