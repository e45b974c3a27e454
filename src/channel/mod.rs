//! Signalling and media channel state machines.
//!
//! Both channels follow the same lifecycle:
//!
//! ```text
//!            connect                      confirm(ok)
//!   Idle ──────────────► Connecting ─────────────────┐
//!    ▲ ▲                   │ confirm(fail)            ▼
//!    │ └───────────────────┘                      Connected ──► Disconnecting ──► Idle
//!    │  indication         accept                     ▲
//!    └──── ConnectIndicationPending ──────────────────┘
//!             reject
//! ```
//!
//! The transitions shared by both kinds live here; [`signalling`] and
//! [`media`] expose the per-channel application API on top of them.
//!
//! A disconnect that races an outgoing connect is not forwarded. It is
//! recorded on the `Connecting` state and replayed exactly once when the
//! attempt resolves, whatever the outcome.

mod link;
pub mod media;
pub mod signalling;

pub use link::{ChannelState, Initiator, PendingTransaction};
pub(crate) use link::{ChannelLink, TeardownCause};

use tracing::{debug, info, warn};

use crate::core::{
    ChannelKind, ConnectFailure, ConnectionId, DeviceId, L2capTransport, ParameterTable,
    SwatError, SwatResult, TransactionId,
};
use crate::event::{DisconnectReason, SwatEvent};
use crate::manager::SwatL2cap;

/// What a teardown request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Teardown {
    /// Channel was idle; nothing to do.
    AlreadyIdle,
    /// Disconnect sent to the transport.
    Started,
    /// Connect in flight; disconnect will be replayed when it resolves.
    Queued,
    /// Pending inbound connect was refused.
    IndicationRejected,
    /// A disconnect is already under way.
    InProgress,
}

impl<T: L2capTransport> SwatL2cap<T> {
    /// Start an outgoing connect on an idle channel.
    pub(crate) fn open_channel(&mut self, kind: ChannelKind, device: DeviceId) -> SwatResult<()> {
        let state = self.registry.state(device, kind);
        if state != ChannelState::Idle {
            debug!(
                target: "swat.channel",
                device = %device,
                kind = %kind,
                state = ?state,
                "Rejecting connect request"
            );
            return Err(SwatError::AlreadyInProgress { device, kind });
        }
        self.registry.ensure(device)?;

        let psm = self.psms.get(kind);
        let connection = self
            .transport
            .connect(device, psm, ParameterTable::for_kind(kind));
        self.registry.set_link(
            device,
            kind,
            ChannelLink::Connecting {
                connection,
                disconnect_queued: false,
            },
        );

        info!(
            target: "swat.channel",
            device = %device,
            kind = %kind,
            connection = %connection,
            psm = %psm,
            "Connect requested"
        );
        Ok(())
    }

    /// Inbound connect attempt from the transport.
    pub(crate) fn on_connect_indication(
        &mut self,
        kind: ChannelKind,
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
    ) {
        let table = ParameterTable::for_kind(kind);
        if let Some((owner, owner_kind)) = self.registry.lookup(connection) {
            warn!(
                target: "swat.channel",
                device = %device,
                kind = %kind,
                connection = %connection,
                owner = %owner,
                owner_kind = %owner_kind,
                "Connect indication reuses a live handle, rejecting"
            );
            self.transport
                .accept_connection(connection, transaction, false, table);
            return;
        }
        let state = self.registry.state(device, kind);
        if state != ChannelState::Idle {
            // First channel wins
            info!(
                target: "swat.channel",
                device = %device,
                kind = %kind,
                connection = %connection,
                state = ?state,
                "Rejecting colliding connect indication"
            );
            self.transport
                .accept_connection(connection, transaction, false, table);
            return;
        }
        if let Err(err) = self.registry.ensure(device) {
            warn!(
                target: "swat.channel",
                device = %device,
                kind = %kind,
                connection = %connection,
                error = %err,
                "Rejecting connect indication"
            );
            self.transport
                .accept_connection(connection, transaction, false, table);
            return;
        }

        self.registry.set_link(
            device,
            kind,
            ChannelLink::IndicationPending {
                connection,
                transaction,
            },
        );
        info!(
            target: "swat.channel",
            device = %device,
            kind = %kind,
            connection = %connection,
            transaction = %transaction,
            "Connect indication"
        );
        self.emit(SwatEvent::connect_indication(
            kind,
            device,
            connection,
            transaction,
        ));
    }

    /// Application answer to a connect indication.
    ///
    /// Answers that do not match the recorded indication are ignored.
    pub(crate) fn respond_to_indication(
        &mut self,
        kind: ChannelKind,
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
    ) {
        let expected = ChannelLink::IndicationPending {
            connection,
            transaction,
        };
        if self.registry.link(device, kind) != expected {
            debug!(
                target: "swat.channel",
                device = %device,
                kind = %kind,
                connection = %connection,
                transaction = %transaction,
                "Ignoring stale connect response"
            );
            return;
        }

        self.transport.accept_connection(
            connection,
            transaction,
            accept,
            ParameterTable::for_kind(kind),
        );

        if accept {
            self.registry
                .set_link(device, kind, ChannelLink::Connected { connection });
            info!(
                target: "swat.channel",
                device = %device,
                kind = %kind,
                connection = %connection,
                "Accepted inbound channel"
            );
            self.emit(SwatEvent::connected(kind, device, connection));
        } else {
            self.registry.set_link(device, kind, ChannelLink::Idle);
            info!(
                target: "swat.channel",
                device = %device,
                kind = %kind,
                connection = %connection,
                "Rejected inbound channel"
            );
        }
    }

    /// Outcome of an outgoing connect.
    pub(crate) fn on_connect_confirm(
        &mut self,
        kind: ChannelKind,
        device: DeviceId,
        connection: ConnectionId,
        outcome: Result<(), ConnectFailure>,
    ) {
        let disconnect_queued = match self.registry.link(device, kind) {
            ChannelLink::Connecting {
                connection: pending,
                disconnect_queued,
            } if pending == connection => disconnect_queued,
            ChannelLink::Connected { connection: open } if open == connection => {
                // Transport confirms inbound channels after they were accepted
                match outcome {
                    Ok(()) => debug!(
                        target: "swat.channel",
                        device = %device,
                        kind = %kind,
                        connection = %connection,
                        "Connect confirm for open channel"
                    ),
                    Err(reason) => {
                        self.registry.set_link(device, kind, ChannelLink::Idle);
                        warn!(
                            target: "swat.channel",
                            device = %device,
                            kind = %kind,
                            connection = %connection,
                            reason = %reason,
                            "Accepted channel failed to open"
                        );
                        self.emit(SwatEvent::disconnected(
                            kind,
                            device,
                            DisconnectReason::RemoteInitiated,
                        ));
                    }
                }
                return;
            }
            other => {
                warn!(
                    target: "swat.channel",
                    device = %device,
                    kind = %kind,
                    connection = %connection,
                    state = ?other.state(),
                    "Unexpected connect confirm, dropping"
                );
                return;
            }
        };

        match outcome {
            Ok(()) => {
                self.registry
                    .set_link(device, kind, ChannelLink::Connected { connection });
                info!(
                    target: "swat.channel",
                    device = %device,
                    kind = %kind,
                    connection = %connection,
                    "Channel connected"
                );
                self.emit(SwatEvent::connected(kind, device, connection));
            }
            Err(reason) => {
                self.registry.set_link(device, kind, ChannelLink::Idle);
                warn!(
                    target: "swat.channel",
                    device = %device,
                    kind = %kind,
                    connection = %connection,
                    reason = %reason,
                    "Connect failed"
                );
                self.emit(SwatEvent::connect_failed(kind, device, reason));
            }
        }

        if disconnect_queued {
            self.replay_disconnect(kind, device);
        }
    }

    /// Tear a channel down, or arrange for it to be torn down.
    pub(crate) fn close_channel(
        &mut self,
        kind: ChannelKind,
        device: DeviceId,
        cause: TeardownCause,
    ) -> Teardown {
        let teardown = match self.registry.link(device, kind) {
            ChannelLink::Idle => Teardown::AlreadyIdle,
            ChannelLink::Connecting { connection, .. } => {
                self.registry.set_link(
                    device,
                    kind,
                    ChannelLink::Connecting {
                        connection,
                        disconnect_queued: true,
                    },
                );
                Teardown::Queued
            }
            ChannelLink::IndicationPending {
                connection,
                transaction,
            } => {
                self.transport.accept_connection(
                    connection,
                    transaction,
                    false,
                    ParameterTable::for_kind(kind),
                );
                self.registry.set_link(device, kind, ChannelLink::Idle);
                self.emit(SwatEvent::disconnected(
                    kind,
                    device,
                    DisconnectReason::LocalRequest,
                ));
                Teardown::IndicationRejected
            }
            ChannelLink::Connected { connection } => {
                self.transport.disconnect(connection);
                self.registry.set_link(
                    device,
                    kind,
                    ChannelLink::Disconnecting { connection, cause },
                );
                Teardown::Started
            }
            ChannelLink::Disconnecting { .. } => Teardown::InProgress,
        };

        debug!(
            target: "swat.channel",
            device = %device,
            kind = %kind,
            cause = ?cause,
            teardown = ?teardown,
            "Close requested"
        );
        teardown
    }

    fn replay_disconnect(&mut self, kind: ChannelKind, device: DeviceId) {
        let teardown = self.close_channel(kind, device, TeardownCause::LocalRequest);
        info!(
            target: "swat.channel",
            device = %device,
            kind = %kind,
            teardown = ?teardown,
            "Replayed queued disconnect"
        );
    }

    /// Transport finished a locally requested disconnect.
    pub(crate) fn on_disconnect_confirm(
        &mut self,
        kind: ChannelKind,
        device: DeviceId,
        connection: ConnectionId,
    ) {
        match self.registry.link(device, kind) {
            ChannelLink::Disconnecting {
                connection: closing,
                cause,
            } if closing == connection => {
                self.finish_teardown(kind, device, connection, cause);
            }
            other => {
                warn!(
                    target: "swat.channel",
                    device = %device,
                    kind = %kind,
                    connection = %connection,
                    state = ?other.state(),
                    "Unexpected disconnect confirm, dropping"
                );
            }
        }
    }

    /// Remote device closed the channel.
    pub(crate) fn on_disconnect_indication(
        &mut self,
        kind: ChannelKind,
        device: DeviceId,
        connection: ConnectionId,
    ) {
        match self.registry.link(device, kind) {
            ChannelLink::Connected { connection: open } if open == connection => {
                self.registry.set_link(device, kind, ChannelLink::Idle);
                info!(
                    target: "swat.channel",
                    device = %device,
                    kind = %kind,
                    connection = %connection,
                    "Remote closed channel"
                );
                self.emit(SwatEvent::disconnected(
                    kind,
                    device,
                    DisconnectReason::RemoteInitiated,
                ));
            }
            ChannelLink::Disconnecting {
                connection: closing,
                cause,
            } if closing == connection => {
                // Both sides closed at once
                self.finish_teardown(kind, device, connection, cause);
            }
            ChannelLink::Connecting {
                connection: pending,
                ..
            } if pending == connection => {
                self.on_connect_confirm(
                    kind,
                    device,
                    connection,
                    Err(ConnectFailure::RemoteDisconnected),
                );
            }
            ChannelLink::IndicationPending {
                connection: pending,
                ..
            } if pending == connection => {
                self.registry.set_link(device, kind, ChannelLink::Idle);
                info!(
                    target: "swat.channel",
                    device = %device,
                    kind = %kind,
                    connection = %connection,
                    "Remote withdrew connect indication"
                );
                self.emit(SwatEvent::disconnected(
                    kind,
                    device,
                    DisconnectReason::RemoteInitiated,
                ));
            }
            other => {
                warn!(
                    target: "swat.channel",
                    device = %device,
                    kind = %kind,
                    connection = %connection,
                    state = ?other.state(),
                    "Unexpected disconnect indication, dropping"
                );
            }
        }
    }

    fn finish_teardown(
        &mut self,
        kind: ChannelKind,
        device: DeviceId,
        connection: ConnectionId,
        cause: TeardownCause,
    ) {
        self.registry.set_link(device, kind, ChannelLink::Idle);
        info!(
            target: "swat.channel",
            device = %device,
            kind = %kind,
            connection = %connection,
            cause = ?cause,
            "Channel disconnected"
        );
        let event = match cause {
            TeardownCause::Unresponsive => SwatEvent::MediaUnresponsiveDisconnected { device },
            TeardownCause::LocalRequest => {
                SwatEvent::disconnected(kind, device, DisconnectReason::LocalRequest)
            }
        };
        self.emit(event);
    }
}
