//! Tokio service driver.
//!
//! [`SwatService`] moves a [`SwatL2cap`] into a task and feeds it from one
//! mailbox. Application requests and transport events share that mailbox, so
//! they are processed strictly in arrival order, which is all the manager
//! needs to keep its single-pending-transaction rule without locks.
//!
//! ```text
//!   application ──┐                         ┌──► SwatEvent receiver
//!                 ├──► mailbox ──► task ────┤
//!   transport  ───┘                         └──► L2capTransport calls
//! ```

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::channel::ChannelState;
use crate::core::{ConnectionId, DeviceId, L2capTransport, SwatError, SwatResult, TransactionId};
use crate::dispatch::TransportEvent;
use crate::event::SwatEvent;
use crate::manager::SwatL2cap;

/// Request mailbox depth.
///
/// Notifications use an unbounded channel so a caller that awaits a reply
/// without draining them can never stall the task.
const MAILBOX_CAPACITY: usize = 256;

/// Request sent to the service task.
#[derive(Debug)]
enum Command {
    SignallingConnect {
        device: DeviceId,
        reply: oneshot::Sender<SwatResult<()>>,
    },
    SignallingRespond {
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
    },
    SignallingDisconnect {
        device: DeviceId,
    },
    MediaConnect {
        device: DeviceId,
        reply: oneshot::Sender<SwatResult<()>>,
    },
    MediaRespond {
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
    },
    MediaClose {
        device: DeviceId,
        reply: oneshot::Sender<bool>,
    },
    MediaUnresponsive {
        device: DeviceId,
    },
    State {
        device: DeviceId,
        reply: oneshot::Sender<(ChannelState, ChannelState)>,
    },
    Transport(TransportEvent),
    Shutdown,
}

/// Cloneable handle to a running [`SwatService`].
#[derive(Debug, Clone)]
pub struct SwatHandle {
    tx: mpsc::Sender<Command>,
}

impl SwatHandle {
    async fn send(&self, command: Command) -> SwatResult<()> {
        self.tx.send(command).await.map_err(|_| SwatError::Shutdown)
    }

    async fn call<R>(&self, command: Command, rx: oneshot::Receiver<R>) -> SwatResult<R> {
        self.send(command).await?;
        rx.await.map_err(|_| SwatError::Shutdown)
    }

    /// See [`SwatL2cap::request_signalling_connect`].
    pub async fn request_signalling_connect(&self, device: DeviceId) -> SwatResult<()> {
        let (reply, rx) = oneshot::channel();
        self.call(Command::SignallingConnect { device, reply }, rx)
            .await?
    }

    /// See [`SwatL2cap::respond_to_signalling_connect`].
    pub async fn respond_to_signalling_connect(
        &self,
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
    ) -> SwatResult<()> {
        self.send(Command::SignallingRespond {
            device,
            connection,
            transaction,
            accept,
        })
        .await
    }

    /// See [`SwatL2cap::request_signalling_disconnect`].
    pub async fn request_signalling_disconnect(&self, device: DeviceId) -> SwatResult<()> {
        self.send(Command::SignallingDisconnect { device }).await
    }

    /// See [`SwatL2cap::request_media_connect`].
    pub async fn request_media_connect(&self, device: DeviceId) -> SwatResult<()> {
        let (reply, rx) = oneshot::channel();
        self.call(Command::MediaConnect { device, reply }, rx).await?
    }

    /// See [`SwatL2cap::respond_to_media_connect`].
    pub async fn respond_to_media_connect(
        &self,
        device: DeviceId,
        connection: ConnectionId,
        transaction: TransactionId,
        accept: bool,
    ) -> SwatResult<()> {
        self.send(Command::MediaRespond {
            device,
            connection,
            transaction,
            accept,
        })
        .await
    }

    /// See [`SwatL2cap::request_media_close`].
    pub async fn request_media_close(&self, device: DeviceId) -> SwatResult<bool> {
        let (reply, rx) = oneshot::channel();
        self.call(Command::MediaClose { device, reply }, rx).await
    }

    /// See [`SwatL2cap::report_media_unresponsive`].
    pub async fn report_media_unresponsive(&self, device: DeviceId) -> SwatResult<()> {
        self.send(Command::MediaUnresponsive { device }).await
    }

    /// Signalling and media state of `device`.
    pub async fn channel_states(
        &self,
        device: DeviceId,
    ) -> SwatResult<(ChannelState, ChannelState)> {
        let (reply, rx) = oneshot::channel();
        self.call(Command::State { device, reply }, rx).await
    }

    /// Deliver a transport event to the dispatcher.
    pub async fn transport_event(&self, event: TransportEvent) -> SwatResult<()> {
        self.send(Command::Transport(event)).await
    }

    /// Stop the service task.
    pub async fn shutdown(&self) -> SwatResult<()> {
        self.send(Command::Shutdown).await
    }
}

/// Task owning a [`SwatL2cap`].
pub struct SwatService;

impl SwatService {
    /// Spawn the service on the current tokio runtime.
    ///
    /// Returns the request handle, the notification receiver and the task
    /// handle. The task ends on [`SwatHandle::shutdown`] or once every handle
    /// is dropped; it yields the manager back so the transport can be reused.
    pub fn spawn<T>(
        swat: SwatL2cap<T>,
    ) -> (
        SwatHandle,
        mpsc::UnboundedReceiver<SwatEvent>,
        JoinHandle<SwatL2cap<T>>,
    )
    where
        T: L2capTransport + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(swat, rx, event_tx));
        (SwatHandle { tx }, event_rx, task)
    }
}

async fn run<T: L2capTransport>(
    mut swat: SwatL2cap<T>,
    mut rx: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<SwatEvent>,
) -> SwatL2cap<T> {
    info!(target: "swat.runtime", "SWAT service started");

    while let Some(command) = rx.recv().await {
        if matches!(command, Command::Shutdown) {
            break;
        }
        process(&mut swat, command);

        for event in swat.drain_events() {
            if events.send(event).is_err() {
                debug!(target: "swat.runtime", "Event receiver dropped");
            }
        }
    }

    info!(target: "swat.runtime", "SWAT service stopped");
    swat
}

fn process<T: L2capTransport>(swat: &mut SwatL2cap<T>, command: Command) {
    match command {
        Command::SignallingConnect { device, reply } => {
            let _ = reply.send(swat.request_signalling_connect(device));
        }
        Command::SignallingRespond {
            device,
            connection,
            transaction,
            accept,
        } => swat.respond_to_signalling_connect(device, connection, transaction, accept),
        Command::SignallingDisconnect { device } => swat.request_signalling_disconnect(device),
        Command::MediaConnect { device, reply } => {
            let _ = reply.send(swat.request_media_connect(device));
        }
        Command::MediaRespond {
            device,
            connection,
            transaction,
            accept,
        } => swat.respond_to_media_connect(device, connection, transaction, accept),
        Command::MediaClose { device, reply } => {
            let _ = reply.send(swat.request_media_close(device));
        }
        Command::MediaUnresponsive { device } => swat.report_media_unresponsive(device),
        Command::State { device, reply } => {
            let _ = reply.send((swat.signalling_state(device), swat.media_state(device)));
        }
        Command::Transport(event) => swat.handle_transport_event(event),
        Command::Shutdown => {}
    }
}
