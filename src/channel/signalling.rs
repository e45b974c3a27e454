//! Signalling channel.
//!
//! Low-traffic control path. Opened before media, closed after it, and
//! configured with an infinite local flush timeout so no control message is
//! ever dropped.

use tracing::debug;

use super::{ChannelState, Teardown, TeardownCause};
use crate::core::{ChannelKind, ConnectionId, DeviceId, L2capTransport, SwatResult, TransactionId};
use crate::manager::SwatL2cap;

const KIND: ChannelKind = ChannelKind::Signalling;

impl<T: L2capTransport> SwatL2cap<T> {
    /// Open the signalling channel to `device`.
    ///
    /// Only valid while the channel is idle; otherwise fails with
    /// [`SwatError::AlreadyInProgress`](crate::SwatError::AlreadyInProgress)
    /// and nothing is sent. The outcome arrives as
    /// [`SwatEvent::SignallingConnected`](crate::SwatEvent::SignallingConnected) or
    /// [`SwatEvent::SignallingConnectFailed`](crate::SwatEvent::SignallingConnectFailed).
    pub fn request_signalling_connect(&mut self, device: DeviceId) -> SwatResult<()> {
        self.open_channel(KIND, device)
    }

    /// Answer a
    /// [`SwatEvent::SignallingConnectIndication`](crate::SwatEvent::SignallingConnectIndication).
    ///
    /// A response whose handle or transaction no longer matches the pending
    /// indication is ignored: the transport may already have given up on it.
    pub fn respond_to_signalling_connect(
        &mut self,
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
    ) {
        self.respond_to_indication(KIND, device, connection, transaction, accept);
    }

    /// Close the signalling channel to `device`.
    ///
    /// Idempotent: on an idle channel this does nothing. A disconnect issued
    /// while a connect is in flight is deferred until that connect resolves.
    pub fn request_signalling_disconnect(&mut self, device: DeviceId) {
        let teardown = self.close_channel(KIND, device, TeardownCause::LocalRequest);
        if teardown == Teardown::AlreadyIdle {
            debug!(
                target: "swat.channel",
                device = %device,
                "Signalling already idle"
            );
        }
    }

    /// State of the signalling channel to `device`.
    pub fn signalling_state(&self, device: DeviceId) -> ChannelState {
        self.channel_state(device, KIND)
    }

    /// Handle of the open signalling channel, for the message codec.
    pub fn signalling_connection(&self, device: DeviceId) -> SwatResult<ConnectionId> {
        self.connection(device, KIND)
    }
}
