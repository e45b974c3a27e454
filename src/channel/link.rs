//! Per-channel link state.
//!
//! Each variant carries exactly the data its state needs, so a channel can
//! never hold more than one pending transaction.

use crate::core::{ConnectionId, TransactionId};

/// Observable lifecycle state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// No connection and nothing in flight.
    Idle,
    /// Outgoing connect issued, awaiting confirmation.
    Connecting,
    /// Inbound connect surfaced to the application, awaiting its answer.
    ConnectIndicationPending,
    /// Channel open.
    Connected,
    /// Disconnect issued, awaiting confirmation.
    Disconnecting,
}

/// Which side started a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initiator {
    /// This device.
    Local,
    /// The remote device.
    Remote,
}

/// Why a channel is being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TeardownCause {
    /// Application request (or a replayed one).
    LocalRequest,
    /// Forced by the unresponsive-media watchdog.
    Unresponsive,
}

/// Read-only view of a channel's pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransaction {
    /// Transport handle of the connection the transaction concerns.
    pub connection: ConnectionId,
    /// Peer transaction, for inbound connects.
    pub transaction: Option<TransactionId>,
    /// Side that started the transaction.
    pub initiator: Initiator,
    /// A disconnect is waiting for the connect attempt to resolve.
    pub disconnect_queued: bool,
}

/// Internal channel state machine value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ChannelLink {
    #[default]
    Idle,
    Connecting {
        connection: ConnectionId,
        disconnect_queued: bool,
    },
    IndicationPending {
        connection: ConnectionId,
        transaction: TransactionId,
    },
    Connected {
        connection: ConnectionId,
    },
    Disconnecting {
        connection: ConnectionId,
        cause: TeardownCause,
    },
}

impl ChannelLink {
    pub(crate) fn state(&self) -> ChannelState {
        match self {
            ChannelLink::Idle => ChannelState::Idle,
            ChannelLink::Connecting { .. } => ChannelState::Connecting,
            ChannelLink::IndicationPending { .. } => ChannelState::ConnectIndicationPending,
            ChannelLink::Connected { .. } => ChannelState::Connected,
            ChannelLink::Disconnecting { .. } => ChannelState::Disconnecting,
        }
    }

    pub(crate) fn connection(&self) -> Option<ConnectionId> {
        match *self {
            ChannelLink::Idle => None,
            ChannelLink::Connecting { connection, .. }
            | ChannelLink::IndicationPending { connection, .. }
            | ChannelLink::Connected { connection }
            | ChannelLink::Disconnecting { connection, .. } => Some(connection),
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, ChannelLink::Idle)
    }

    pub(crate) fn pending(&self) -> Option<PendingTransaction> {
        match *self {
            ChannelLink::Idle | ChannelLink::Connected { .. } => None,
            ChannelLink::Connecting {
                connection,
                disconnect_queued,
            } => Some(PendingTransaction {
                connection,
                transaction: None,
                initiator: Initiator::Local,
                disconnect_queued,
            }),
            ChannelLink::IndicationPending {
                connection,
                transaction,
            } => Some(PendingTransaction {
                connection,
                transaction: Some(transaction),
                initiator: Initiator::Remote,
                disconnect_queued: false,
            }),
            ChannelLink::Disconnecting { connection, .. } => Some(PendingTransaction {
                connection,
                transaction: None,
                initiator: Initiator::Local,
                disconnect_queued: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_has_nothing_pending() {
        let link = ChannelLink::default();
        assert_eq!(link.state(), ChannelState::Idle);
        assert_eq!(link.connection(), None);
        assert_eq!(link.pending(), None);
        assert!(link.is_idle());
    }

    #[test]
    fn test_connected_has_nothing_pending() {
        let link = ChannelLink::Connected {
            connection: ConnectionId(3),
        };
        assert_eq!(link.state(), ChannelState::Connected);
        assert_eq!(link.connection(), Some(ConnectionId(3)));
        assert_eq!(link.pending(), None);
    }

    #[test]
    fn test_indication_pending_view() {
        let link = ChannelLink::IndicationPending {
            connection: ConnectionId(10),
            transaction: TransactionId(5),
        };
        let pending = link.pending().expect("indication is a pending transaction");
        assert_eq!(pending.initiator, Initiator::Remote);
        assert_eq!(pending.transaction, Some(TransactionId(5)));
        assert_eq!(pending.connection, ConnectionId(10));
    }

    #[test]
    fn test_queued_disconnect_visible() {
        let link = ChannelLink::Connecting {
            connection: ConnectionId(1),
            disconnect_queued: true,
        };
        assert!(link.pending().is_some_and(|p| p.disconnect_queued));
    }
}
