//! The SWAT channel manager.
//!
//! [`SwatL2cap`] owns the device registry and the transport handle. It is a
//! plain synchronous value: application requests and transport events are
//! both processed with `&mut self`, one at a time, in arrival order. No call
//! waits for the transport; completions arrive later through
//! [`handle_transport_event`](SwatL2cap::handle_transport_event).

use std::collections::VecDeque;

use crate::channel::{ChannelState, PendingTransaction};
use crate::config::SwatConfig;
use crate::core::{ChannelKind, ConnectionId, DeviceId, L2capTransport, SwatError, SwatResult};
use crate::event::SwatEvent;
use crate::registrar::{register_channels, RegisteredPsms};
use crate::registry::DeviceRegistry;

/// SWAT signalling/media channel manager.
///
/// # Example
///
/// ```ignore
/// use swat_l2cap::prelude::*;
///
/// let mut swat = SwatL2cap::register(SwatConfig::default(), controller)?;
///
/// swat.request_signalling_connect(DeviceId(1))?;
///
/// // Later, from the transport:
/// swat.handle_transport_event(TransportEvent::ConnectConfirm {
///     connection,
///     outcome: ConnectOutcome::Success,
/// });
///
/// while let Some(event) = swat.poll_event() {
///     // SignallingConnected { .. }
/// }
/// ```
#[derive(Debug)]
pub struct SwatL2cap<T: L2capTransport> {
    /// Manager configuration.
    pub(crate) config: SwatConfig,

    /// PSMs reserved at bring-up.
    pub(crate) psms: RegisteredPsms,

    /// Transport service.
    pub(crate) transport: T,

    /// Per-device channel state.
    pub(crate) registry: DeviceRegistry,

    /// Notifications not yet collected by the application.
    pub(crate) events: VecDeque<SwatEvent>,
}

impl<T: L2capTransport> SwatL2cap<T> {
    /// Register the SWAT PSMs with `transport` and build the manager.
    ///
    /// Fails with [`SwatError::Config`] for an invalid configuration and
    /// [`SwatError::Registration`] if either PSM cannot be reserved.
    pub fn register(config: SwatConfig, mut transport: T) -> SwatResult<Self> {
        let psms = register_channels(&config, &mut transport)?;
        Ok(Self {
            registry: DeviceRegistry::new(config.max_devices),
            config,
            psms,
            transport,
            events: VecDeque::new(),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &SwatConfig {
        &self.config
    }

    /// Get the registered PSMs.
    pub fn psms(&self) -> RegisteredPsms {
        self.psms
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get mutable access to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Get the device registry.
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Take the oldest pending notification.
    pub fn poll_event(&mut self) -> Option<SwatEvent> {
        self.events.pop_front()
    }

    /// Take all pending notifications.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SwatEvent> + '_ {
        self.events.drain(..)
    }

    /// State of a device's channel.
    pub fn channel_state(&self, device: DeviceId, kind: ChannelKind) -> ChannelState {
        self.registry.state(device, kind)
    }

    /// Pending transaction on a device's channel.
    pub fn pending_transaction(
        &self,
        device: DeviceId,
        kind: ChannelKind,
    ) -> Option<PendingTransaction> {
        self.registry.link(device, kind).pending()
    }

    /// Handle of a connected channel.
    ///
    /// Fails with [`SwatError::NotConnected`] unless the channel is
    /// [`ChannelState::Connected`].
    pub fn connection(&self, device: DeviceId, kind: ChannelKind) -> SwatResult<ConnectionId> {
        let link = self.registry.link(device, kind);
        match (link.state(), link.connection()) {
            (ChannelState::Connected, Some(connection)) => Ok(connection),
            _ => Err(SwatError::NotConnected { device, kind }),
        }
    }

    pub(crate) fn emit(&mut self, event: SwatEvent) {
        self.events.push_back(event);
    }
}
