//! Media channel.
//!
//! Audio-bearing path. Uses a bounded local flush timeout so stale audio is
//! discarded rather than retransmitted late.

use tracing::info;

use super::{ChannelState, Teardown, TeardownCause};
use crate::core::{ChannelKind, ConnectionId, DeviceId, L2capTransport, SwatResult, TransactionId};
use crate::manager::SwatL2cap;

const KIND: ChannelKind = ChannelKind::Media;

impl<T: L2capTransport> SwatL2cap<T> {
    /// Open the media channel to `device`.
    ///
    /// Only valid while the channel is idle; otherwise fails with
    /// [`SwatError::AlreadyInProgress`](crate::SwatError::AlreadyInProgress).
    pub fn request_media_connect(&mut self, device: DeviceId) -> SwatResult<()> {
        self.open_channel(KIND, device)
    }

    /// Answer a
    /// [`SwatEvent::MediaConnectIndication`](crate::SwatEvent::MediaConnectIndication).
    ///
    /// Stale responses are ignored.
    pub fn respond_to_media_connect(
        &mut self,
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
    ) {
        self.respond_to_indication(KIND, device, connection, transaction, accept);
    }

    /// Close the media channel to `device`.
    ///
    /// Returns `false` if the channel was already idle: nothing was sent and
    /// no notification will follow. Returns `true` otherwise, and the caller
    /// should wait for [`SwatEvent::MediaDisconnected`](crate::SwatEvent::MediaDisconnected)
    /// (or `MediaConnectFailed` if a connect was still in flight).
    pub fn request_media_close(&mut self, device: DeviceId) -> bool {
        let teardown = self.close_channel(KIND, device, TeardownCause::LocalRequest);
        info!(
            target: "swat.channel",
            device = %device,
            teardown = ?teardown,
            "Media close"
        );
        teardown != Teardown::AlreadyIdle
    }

    /// State of the media channel to `device`.
    pub fn media_state(&self, device: DeviceId) -> ChannelState {
        self.channel_state(device, KIND)
    }

    /// Handle of the open media channel, for the audio path.
    pub fn media_connection(&self, device: DeviceId) -> SwatResult<ConnectionId> {
        self.connection(device, KIND)
    }
}
