//! Transport event dispatcher.
//!
//! Every asynchronous event from the transport enters through
//! [`SwatL2cap::handle_transport_event`]. Inbound indications are routed by
//! PSM; everything else by connection handle through the device registry.
//! Events that cannot be routed are logged and dropped: they cannot match any
//! request the application made.

use tracing::{trace, warn};

use crate::core::{
    ChannelKind, ConnectFailure, ConnectionId, DeviceId, L2capTransport, Psm, TransactionId,
};
use crate::manager::SwatL2cap;

/// Result of an outgoing connect as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Channel opened and configured.
    Success,
    /// Attempt failed.
    Failed(ConnectFailure),
}

impl From<ConnectOutcome> for Result<(), ConnectFailure> {
    fn from(outcome: ConnectOutcome) -> Self {
        match outcome {
            ConnectOutcome::Success => Ok(()),
            ConnectOutcome::Failed(reason) => Err(reason),
        }
    }
}

/// Asynchronous event from the L2CAP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    /// Remote device wants to open a channel on one of our PSMs.
    ConnectIndication {
        /// Remote device.
        device: DeviceId,
        /// PSM the peer connected to.
        psm: Psm,
        /// Handle assigned to the pending connection.
        connection: ConnectionId,
        /// Peer transaction to echo in the response.
        transaction: TransactionId,
    },

    /// Outgoing connect resolved.
    ConnectConfirm {
        /// Handle returned by [`L2capTransport::connect`].
        connection: ConnectionId,
        /// Outcome.
        outcome: ConnectOutcome,
    },

    /// Locally requested disconnect completed.
    DisconnectConfirm {
        /// Closed connection.
        connection: ConnectionId,
    },

    /// Remote device closed a connection.
    DisconnectIndication {
        /// Closed connection.
        connection: ConnectionId,
    },
}

impl TransportEvent {
    /// Connection handle the event refers to.
    pub fn connection(&self) -> ConnectionId {
        match *self {
            TransportEvent::ConnectIndication { connection, .. }
            | TransportEvent::ConnectConfirm { connection, .. }
            | TransportEvent::DisconnectConfirm { connection }
            | TransportEvent::DisconnectIndication { connection } => connection,
        }
    }
}

impl<T: L2capTransport> SwatL2cap<T> {
    /// Process one transport event.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        trace!(target: "swat.dispatch", event = ?event, "Transport event");

        match event {
            TransportEvent::ConnectIndication {
                device,
                psm,
                connection,
                transaction,
            } => {
                let Some(kind) = self.psms.kind_for(psm) else {
                    warn!(
                        target: "swat.dispatch",
                        device = %device,
                        psm = %psm,
                        connection = %connection,
                        "Connect indication for unregistered PSM, dropping"
                    );
                    return;
                };
                self.on_connect_indication(kind, device, connection, transaction);
            }
            TransportEvent::ConnectConfirm {
                connection,
                outcome,
            } => {
                if let Some((device, kind)) = self.route(&event) {
                    self.on_connect_confirm(kind, device, connection, outcome.into());
                }
            }
            TransportEvent::DisconnectConfirm { connection } => {
                if let Some((device, kind)) = self.route(&event) {
                    self.on_disconnect_confirm(kind, device, connection);
                }
            }
            TransportEvent::DisconnectIndication { connection } => {
                if let Some((device, kind)) = self.route(&event) {
                    self.on_disconnect_indication(kind, device, connection);
                }
            }
        }
    }

    fn route(&self, event: &TransportEvent) -> Option<(DeviceId, ChannelKind)> {
        let connection = event.connection();
        let routed = self.registry.lookup(connection);
        if routed.is_none() {
            warn!(
                target: "swat.dispatch",
                connection = %connection,
                event = ?event,
                "Event for unknown connection, dropping"
            );
        }
        routed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelState;
    use crate::mock::{events, manager, TransportCall};

    #[test]
    fn test_unknown_connection_dropped() {
        let (mut swat, transport) = manager();

        swat.handle_transport_event(TransportEvent::ConnectConfirm {
            connection: ConnectionId(0x99),
            outcome: ConnectOutcome::Success,
        });
        swat.handle_transport_event(TransportEvent::DisconnectConfirm {
            connection: ConnectionId(0x99),
        });
        swat.handle_transport_event(TransportEvent::DisconnectIndication {
            connection: ConnectionId(0x99),
        });

        assert!(transport.requests().is_empty());
        assert!(events(&mut swat).is_empty());
        assert!(swat.registry().is_empty());
    }

    #[test]
    fn test_unregistered_psm_dropped() {
        let (mut swat, transport) = manager();

        swat.handle_transport_event(TransportEvent::ConnectIndication {
            device: DeviceId(1),
            psm: Psm(0x0019),
            connection: ConnectionId(5),
            transaction: TransactionId(1),
        });

        assert!(transport.requests().is_empty());
        assert!(events(&mut swat).is_empty());
        assert!(swat.registry().is_empty());
    }

    #[test]
    fn test_routes_by_psm() {
        let (mut swat, _transport) = manager();

        swat.handle_transport_event(TransportEvent::ConnectIndication {
            device: DeviceId(1),
            psm: Psm(0x1003),
            connection: ConnectionId(5),
            transaction: TransactionId(1),
        });

        assert_eq!(swat.media_state(DeviceId(1)), ChannelState::ConnectIndicationPending);
        assert_eq!(swat.signalling_state(DeviceId(1)), ChannelState::Idle);
    }

    #[test]
    fn test_disconnect_confirm_for_connected_channel_dropped() {
        let (mut swat, transport) = manager();
        swat.request_signalling_connect(DeviceId(1)).unwrap();
        let connection = transport.last_connection();
        swat.handle_transport_event(TransportEvent::ConnectConfirm {
            connection,
            outcome: ConnectOutcome::Success,
        });
        events(&mut swat);

        swat.handle_transport_event(TransportEvent::DisconnectConfirm { connection });

        assert_eq!(swat.signalling_state(DeviceId(1)), ChannelState::Connected);
        assert!(events(&mut swat).is_empty());
    }

    #[test]
    fn test_duplicate_connect_confirm_dropped() {
        let (mut swat, transport) = manager();
        swat.request_media_connect(DeviceId(1)).unwrap();
        let connection = transport.last_connection();
        let confirm = TransportEvent::ConnectConfirm {
            connection,
            outcome: ConnectOutcome::Success,
        };

        swat.handle_transport_event(confirm);
        swat.handle_transport_event(confirm);

        assert_eq!(events(&mut swat).len(), 1);
    }

    #[test]
    fn test_remote_disconnect_during_connect() {
        let (mut swat, transport) = manager();
        swat.request_media_connect(DeviceId(1)).unwrap();
        let connection = transport.last_connection();
        assert!(swat.request_media_close(DeviceId(1)));

        swat.handle_transport_event(TransportEvent::DisconnectIndication { connection });

        assert_eq!(swat.media_state(DeviceId(1)), ChannelState::Idle);
        assert!(transport.disconnects().is_empty());
        assert_eq!(
            events(&mut swat),
            vec![crate::SwatEvent::MediaConnectFailed {
                device: DeviceId(1),
                reason: ConnectFailure::RemoteDisconnected
            }]
        );
    }

    #[test]
    fn test_registry_full_rejects_indication() {
        let (mut swat, transport) = manager();
        let max = swat.config().max_devices as u16;
        for id in 0..max {
            swat.request_signalling_connect(DeviceId(id)).unwrap();
        }

        let err = swat.request_signalling_connect(DeviceId(max)).unwrap_err();
        assert!(matches!(err, crate::SwatError::RegistryFull { .. }));

        swat.handle_transport_event(TransportEvent::ConnectIndication {
            device: DeviceId(max),
            psm: Psm(0x1001),
            connection: ConnectionId(0x10),
            transaction: TransactionId(3),
        });
        assert!(matches!(
            transport.requests().last(),
            Some(TransportCall::Accept { accept: false, .. })
        ));
        assert!(!swat.registry().contains(DeviceId(max)));
    }

    #[test]
    fn test_indication_reusing_live_handle_rejected() {
        let (mut swat, transport) = manager();
        swat.request_media_connect(DeviceId(1)).unwrap();
        let connection = transport.last_connection();
        swat.handle_transport_event(TransportEvent::ConnectConfirm {
            connection,
            outcome: ConnectOutcome::Success,
        });
        events(&mut swat);

        swat.handle_transport_event(TransportEvent::ConnectIndication {
            device: DeviceId(2),
            psm: Psm(0x1003),
            connection,
            transaction: TransactionId(4),
        });

        assert!(matches!(
            transport.requests().last(),
            Some(TransportCall::Accept { accept: false, .. })
        ));
        assert!(!swat.registry().contains(DeviceId(2)));
        assert!(events(&mut swat).is_empty());
        assert_eq!(
            swat.registry().lookup(connection),
            Some((DeviceId(1), ChannelKind::Media))
        );

        // Original channel still routes
        swat.handle_transport_event(TransportEvent::DisconnectIndication { connection });
        assert_eq!(swat.media_state(DeviceId(1)), ChannelState::Idle);
        assert_eq!(
            events(&mut swat),
            vec![crate::SwatEvent::MediaDisconnected {
                device: DeviceId(1),
                reason: crate::DisconnectReason::RemoteInitiated
            }]
        );
    }

    /// Drive a mixed sequence of requests and events and check after every
    /// step that no channel ever holds more than one pending transaction and
    /// that the connection index agrees with the channel states.
    #[test]
    fn test_single_pending_transaction_invariant() {
        let (mut swat, transport) = manager();
        let devices = [DeviceId(1), DeviceId(2)];
        let mut step = 0u32;

        let check = |swat: &crate::SwatL2cap<crate::mock::MockTransport>| {
            for (device, entry) in swat.registry().iter() {
                for kind in [ChannelKind::Signalling, ChannelKind::Media] {
                    let state = entry.state(kind);
                    let pending = entry.pending(kind);
                    match state {
                        ChannelState::Idle | ChannelState::Connected => assert!(pending.is_none()),
                        _ => {
                            let pending = pending.expect("transitional state has a transaction");
                            assert_eq!(
                                swat.registry().lookup(pending.connection),
                                Some((device, kind))
                            );
                        }
                    }
                }
            }
        };

        for round in 0..3 {
            for &device in &devices {
                let _ = swat.request_signalling_connect(device);
                let _ = swat.request_media_connect(device);
                check(&swat);
                swat.request_signalling_disconnect(device);
                check(&swat);
                let _ = swat.request_media_connect(device);
                let _ = swat.request_signalling_connect(device);
                check(&swat);
            }

            // Resolve every outstanding connect, alternating outcomes
            let pending: Vec<_> = transport
                .requests()
                .into_iter()
                .filter_map(|call| match call {
                    TransportCall::Connect { connection, .. } => Some(connection),
                    _ => None,
                })
                .collect();
            for connection in pending {
                step += 1;
                let outcome = if (step + round) % 2 == 0 {
                    ConnectOutcome::Success
                } else {
                    ConnectOutcome::Failed(ConnectFailure::Refused)
                };
                swat.handle_transport_event(TransportEvent::ConnectConfirm {
                    connection,
                    outcome,
                });
                check(&swat);
            }

            for &device in &devices {
                swat.report_media_unresponsive(device);
                check(&swat);
                swat.request_media_close(device);
                check(&swat);
            }

            for connection in transport.disconnects() {
                swat.handle_transport_event(TransportEvent::DisconnectConfirm { connection });
                check(&swat);
            }
        }

        // Every queued signalling disconnect was replayed at most once
        let disconnects = transport.disconnects();
        let mut unique = disconnects.clone();
        unique.sort_by_key(|c| c.0);
        unique.dedup();
        assert_eq!(unique.len(), disconnects.len());
    }
}
