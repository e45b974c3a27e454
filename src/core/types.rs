//! Identifier types shared by every layer.

use std::fmt;

/// Identifier of a tracked remote device.
///
/// Assigned by the device manager above this crate; opaque here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u16);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

impl From<u16> for DeviceId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Transport-assigned handle of one channel instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u16);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl From<u16> for ConnectionId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

/// Peer-supplied tag pairing a connect indication with its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(pub u8);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for TransactionId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// Protocol/Service Multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Psm(pub u16);

impl Psm {
    /// Check that this is a valid L2CAP PSM.
    ///
    /// The least significant bit of the low octet must be 1 and the least
    /// significant bit of the high octet must be 0.
    pub fn is_valid(&self) -> bool {
        self.0 & 0x0001 == 0x0001 && self.0 & 0x0100 == 0
    }
}

impl fmt::Display for Psm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// The two SWAT channel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Control path for protocol handshakes.
    Signalling,
    /// Audio-bearing path.
    Media,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Signalling => f.write_str("signalling"),
            ChannelKind::Media => f.write_str("media"),
        }
    }
}
