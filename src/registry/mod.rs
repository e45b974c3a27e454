//! Device registry.
//!
//! Owns the per-device channel state. Entries are created on the first
//! connect request or inbound indication for a device and removed as soon as
//! both of its channels are idle again.
//!
//! The registry also indexes every live connection handle so that transport
//! events, which carry only a handle, can be routed back to their device.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::channel::{ChannelLink, ChannelState, PendingTransaction};
use crate::core::{ChannelKind, ConnectionId, DeviceId, SwatError, SwatResult};

/// Channel state held for one remote device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceEntry {
    signalling: ChannelLink,
    media: ChannelLink,
}

impl DeviceEntry {
    pub(crate) fn link(&self, kind: ChannelKind) -> ChannelLink {
        match kind {
            ChannelKind::Signalling => self.signalling,
            ChannelKind::Media => self.media,
        }
    }

    fn link_mut(&mut self, kind: ChannelKind) -> &mut ChannelLink {
        match kind {
            ChannelKind::Signalling => &mut self.signalling,
            ChannelKind::Media => &mut self.media,
        }
    }

    /// State of the `kind` channel.
    pub fn state(&self, kind: ChannelKind) -> ChannelState {
        self.link(kind).state()
    }

    /// Pending transaction on the `kind` channel, if any.
    pub fn pending(&self, kind: ChannelKind) -> Option<PendingTransaction> {
        self.link(kind).pending()
    }

    /// Check if both channels are idle.
    pub fn is_idle(&self) -> bool {
        self.signalling.is_idle() && self.media.is_idle()
    }
}

/// Registry of tracked remote devices.
#[derive(Debug)]
pub struct DeviceRegistry {
    /// Tracked devices.
    entries: HashMap<DeviceId, DeviceEntry>,

    /// Live connection handle -> owning channel.
    connections: HashMap<ConnectionId, (DeviceId, ChannelKind)>,

    /// Maximum number of tracked devices.
    max_devices: usize,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new(max_devices: usize) -> Self {
        Self {
            entries: HashMap::new(),
            connections: HashMap::new(),
            max_devices,
        }
    }

    /// Number of tracked devices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no device is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if `device` is tracked.
    pub fn contains(&self, device: DeviceId) -> bool {
        self.entries.contains_key(&device)
    }

    /// Entry for `device`.
    pub fn get(&self, device: DeviceId) -> Option<&DeviceEntry> {
        self.entries.get(&device)
    }

    /// Channel state, treating untracked devices as idle.
    pub fn state(&self, device: DeviceId, kind: ChannelKind) -> ChannelState {
        self.link(device, kind).state()
    }

    pub(crate) fn link(&self, device: DeviceId, kind: ChannelKind) -> ChannelLink {
        self.entries
            .get(&device)
            .map(|entry| entry.link(kind))
            .unwrap_or_default()
    }

    /// Device and channel a connection handle belongs to.
    pub fn lookup(&self, connection: ConnectionId) -> Option<(DeviceId, ChannelKind)> {
        self.connections.get(&connection).copied()
    }

    /// Make sure `device` has an entry, creating one if there is room.
    pub(crate) fn ensure(&mut self, device: DeviceId) -> SwatResult<()> {
        if self.entries.contains_key(&device) {
            return Ok(());
        }
        if self.entries.len() >= self.max_devices {
            return Err(SwatError::RegistryFull {
                max: self.max_devices,
            });
        }
        debug!(target: "swat.registry", device = %device, "Tracking device");
        self.entries.insert(device, DeviceEntry::default());
        Ok(())
    }

    /// Move a channel to `link`, keeping the connection index in step.
    ///
    /// The device entry is released when both channels end up idle.
    pub(crate) fn set_link(&mut self, device: DeviceId, kind: ChannelKind, link: ChannelLink) {
        let Some(entry) = self.entries.get_mut(&device) else {
            return;
        };

        let slot = entry.link_mut(kind);
        if let Some(old) = slot.connection() {
            self.connections.remove(&old);
        }
        if let Some(new) = link.connection() {
            self.connections.insert(new, (device, kind));
        }
        trace!(
            target: "swat.registry",
            device = %device,
            kind = %kind,
            from = ?slot.state(),
            to = ?link.state(),
            "Channel transition"
        );
        *slot = link;

        if entry.is_idle() {
            self.entries.remove(&device);
            debug!(target: "swat.registry", device = %device, "Released idle device");
        }
    }

    /// Iterate over tracked devices.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceId, &DeviceEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }
}
