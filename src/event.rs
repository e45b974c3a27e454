//! Notifications delivered to the application layer.

use crate::core::{ChannelKind, ConnectFailure, ConnectionId, DeviceId, TransactionId};

/// Why a connected channel went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The application asked for the teardown.
    LocalRequest,
    /// The remote device tore the channel down.
    RemoteInitiated,
}

/// Event from the channel manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwatEvent {
    /// A remote device wants to open the signalling channel.
    ///
    /// Answer with
    /// [`respond_to_signalling_connect`](crate::SwatL2cap::respond_to_signalling_connect).
    SignallingConnectIndication {
        /// Remote device.
        device: DeviceId,
        /// Handle of the pending connection.
        connection: ConnectionId,
        /// Transaction to echo in the response.
        transaction: TransactionId,
    },

    /// Signalling channel is open.
    SignallingConnected {
        /// Remote device.
        device: DeviceId,
        /// Handle of the open channel.
        connection: ConnectionId,
    },

    /// Outgoing signalling connect failed.
    SignallingConnectFailed {
        /// Remote device.
        device: DeviceId,
        /// Transport failure reason.
        reason: ConnectFailure,
    },

    /// Signalling channel closed.
    SignallingDisconnected {
        /// Remote device.
        device: DeviceId,
        /// Who closed it.
        reason: DisconnectReason,
    },

    /// A remote device wants to open the media channel.
    MediaConnectIndication {
        /// Remote device.
        device: DeviceId,
        /// Handle of the pending connection.
        connection: ConnectionId,
        /// Transaction to echo in the response.
        transaction: TransactionId,
    },

    /// Media channel is open.
    MediaConnected {
        /// Remote device.
        device: DeviceId,
        /// Handle of the open channel.
        connection: ConnectionId,
    },

    /// Outgoing media connect failed.
    MediaConnectFailed {
        /// Remote device.
        device: DeviceId,
        /// Transport failure reason.
        reason: ConnectFailure,
    },

    /// Media channel closed.
    MediaDisconnected {
        /// Remote device.
        device: DeviceId,
        /// Who closed it.
        reason: DisconnectReason,
    },

    /// Media channel was torn down after it stopped responding.
    ///
    /// Sent instead of [`SwatEvent::MediaDisconnected`] so the application can
    /// decide whether to reconnect.
    MediaUnresponsiveDisconnected {
        /// Remote device.
        device: DeviceId,
    },
}

impl SwatEvent {
    pub(crate) fn connect_indication(
        kind: ChannelKind,
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
    ) -> Self {
        match kind {
            ChannelKind::Signalling => SwatEvent::SignallingConnectIndication {
                device,
                connection,
                transaction,
            },
            ChannelKind::Media => SwatEvent::MediaConnectIndication {
                device,
                connection,
                transaction,
            },
        }
    }

    pub(crate) fn connected(kind: ChannelKind, device: DeviceId, connection: ConnectionId) -> Self {
        match kind {
            ChannelKind::Signalling => SwatEvent::SignallingConnected { device, connection },
            ChannelKind::Media => SwatEvent::MediaConnected { device, connection },
        }
    }

    pub(crate) fn connect_failed(kind: ChannelKind, device: DeviceId, reason: ConnectFailure) -> Self {
        match kind {
            ChannelKind::Signalling => SwatEvent::SignallingConnectFailed { device, reason },
            ChannelKind::Media => SwatEvent::MediaConnectFailed { device, reason },
        }
    }

    pub(crate) fn disconnected(
        kind: ChannelKind,
        device: DeviceId,
        reason: DisconnectReason,
    ) -> Self {
        match kind {
            ChannelKind::Signalling => SwatEvent::SignallingDisconnected { device, reason },
            ChannelKind::Media => SwatEvent::MediaDisconnected { device, reason },
        }
    }

    /// Channel the event concerns.
    pub fn kind(&self) -> ChannelKind {
        match self {
            SwatEvent::SignallingConnectIndication { .. }
            | SwatEvent::SignallingConnected { .. }
            | SwatEvent::SignallingConnectFailed { .. }
            | SwatEvent::SignallingDisconnected { .. } => ChannelKind::Signalling,
            SwatEvent::MediaConnectIndication { .. }
            | SwatEvent::MediaConnected { .. }
            | SwatEvent::MediaConnectFailed { .. }
            | SwatEvent::MediaDisconnected { .. }
            | SwatEvent::MediaUnresponsiveDisconnected { .. } => ChannelKind::Media,
        }
    }

    /// Device the event concerns.
    pub fn device(&self) -> DeviceId {
        match self {
            SwatEvent::SignallingConnectIndication { device, .. }
            | SwatEvent::SignallingConnected { device, .. }
            | SwatEvent::SignallingConnectFailed { device, .. }
            | SwatEvent::SignallingDisconnected { device, .. }
            | SwatEvent::MediaConnectIndication { device, .. }
            | SwatEvent::MediaConnected { device, .. }
            | SwatEvent::MediaConnectFailed { device, .. }
            | SwatEvent::MediaDisconnected { device, .. }
            | SwatEvent::MediaUnresponsiveDisconnected { device } => *device,
        }
    }
}
