//! Recording transport used by the unit tests.

use std::sync::{Arc, Mutex};

use crate::config::SwatConfig;
use crate::core::{
    ChannelKind, ConnectionId, DeviceId, L2capTransport, ParameterTable, Psm, ReservationError,
    TransactionId,
};
use crate::event::SwatEvent;
use crate::manager::SwatL2cap;

/// One call made on the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportCall {
    Reserve {
        kind: ChannelKind,
        psm: Psm,
    },
    Connect {
        device: DeviceId,
        psm: Psm,
        connection: ConnectionId,
        table: ParameterTable,
    },
    Accept {
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
        table: ParameterTable,
    },
    Disconnect {
        connection: ConnectionId,
    },
}

#[derive(Debug)]
struct MockState {
    calls: Vec<TransportCall>,
    next_connection: u16,
    refuse: Option<(ChannelKind, ReservationError)>,
}

/// Transport that records every call. Clones share the same log.
#[derive(Debug, Clone)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                calls: Vec::new(),
                next_connection: 0x40,
                refuse: None,
            })),
        }
    }

    /// Make the reservation for `kind` fail with `error`.
    pub(crate) fn refuse_reservation(&self, kind: ChannelKind, error: ReservationError) {
        self.state.lock().unwrap().refuse = Some((kind, error));
    }

    pub(crate) fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls made after registration.
    pub(crate) fn requests(&self) -> Vec<TransportCall> {
        self.calls()
            .into_iter()
            .filter(|call| !matches!(call, TransportCall::Reserve { .. }))
            .collect()
    }

    pub(crate) fn disconnects(&self) -> Vec<ConnectionId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::Disconnect { connection } => Some(connection),
                _ => None,
            })
            .collect()
    }

    /// Handle returned by the most recent connect.
    pub(crate) fn last_connection(&self) -> ConnectionId {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                TransportCall::Connect { connection, .. } => Some(connection),
                _ => None,
            })
            .expect("no connect issued")
    }
}

impl L2capTransport for MockTransport {
    fn reserve_multiplexer(
        &mut self,
        kind: ChannelKind,
        psm: Psm,
    ) -> Result<Psm, ReservationError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TransportCall::Reserve { kind, psm });
        match &state.refuse {
            Some((refused, error)) if *refused == kind => Err(error.clone()),
            _ => Ok(psm),
        }
    }

    fn connect(&mut self, device: DeviceId, psm: Psm, table: &ParameterTable) -> ConnectionId {
        let mut state = self.state.lock().unwrap();
        let connection = ConnectionId(state.next_connection);
        state.next_connection += 1;
        state.calls.push(TransportCall::Connect {
            device,
            psm,
            connection,
            table: *table,
        });
        connection
    }

    fn accept_connection(
        &mut self,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
        table: &ParameterTable,
    ) {
        self.state.lock().unwrap().calls.push(TransportCall::Accept {
            connection,
            transaction,
            accept,
            table: *table,
        });
    }

    fn disconnect(&mut self, connection: ConnectionId) {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(TransportCall::Disconnect { connection });
    }
}

/// Install a test log writer, honouring `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Manager over a fresh mock transport with the default configuration.
pub(crate) fn manager() -> (SwatL2cap<MockTransport>, MockTransport) {
    init_tracing();
    let transport = MockTransport::new();
    let swat = SwatL2cap::register(SwatConfig::default(), transport.clone())
        .expect("default registration succeeds");
    (swat, transport)
}

pub(crate) fn events(swat: &mut SwatL2cap<MockTransport>) -> Vec<SwatEvent> {
    swat.drain_events().collect()
}
