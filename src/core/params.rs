//! Channel parameter tables.
//!
//! One immutable table per channel kind, offered to the transport on every
//! outgoing connect and every accepted inbound connect.

use super::constants::*;
use super::types::ChannelKind;

/// Inclusive flush-timeout range in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushRange {
    /// Lowest acceptable timeout.
    pub min: u32,
    /// Highest acceptable timeout.
    pub max: u32,
}

impl FlushRange {
    /// Range accepting anything from zero to infinite.
    pub const ANY: Self = Self {
        min: FLUSH_TIMEOUT_ZERO,
        max: FLUSH_TIMEOUT_INFINITE,
    };

    /// Range pinned to the infinite timeout.
    pub const INFINITE: Self = Self {
        min: FLUSH_TIMEOUT_INFINITE,
        max: FLUSH_TIMEOUT_INFINITE,
    };

    /// Create a range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Check if `timeout` falls inside the range.
    pub fn contains(&self, timeout: u32) -> bool {
        self.min <= timeout && timeout <= self.max
    }

    /// Check if the range only admits the infinite timeout.
    pub fn is_unbounded(&self) -> bool {
        self.min == FLUSH_TIMEOUT_INFINITE
    }
}

/// A single negotiable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOption {
    /// Largest SDU we accept from the peer.
    MtuIn(u16),
    /// Smallest SDU size the peer must accept from us.
    MtuOut(u16),
    /// Flush timeout we accept the peer using.
    FlushIn(FlushRange),
    /// Flush timeout we are willing to use.
    FlushOut(FlushRange),
}

impl ChannelOption {
    /// Append this option as auto-configuration words.
    fn push_words(&self, out: &mut Vec<u16>) {
        match *self {
            ChannelOption::MtuIn(mtu) => out.extend_from_slice(&[autopt::MTU_IN, mtu]),
            ChannelOption::MtuOut(mtu) => out.extend_from_slice(&[autopt::MTU_OUT, mtu]),
            ChannelOption::FlushIn(range) => {
                out.push(autopt::FLUSH_IN);
                push_range(out, range);
            }
            ChannelOption::FlushOut(range) => {
                out.push(autopt::FLUSH_OUT);
                push_range(out, range);
            }
        }
    }
}

fn push_range(out: &mut Vec<u16>, range: FlushRange) {
    for value in [range.min, range.max] {
        out.push((value >> 16) as u16);
        out.push(value as u16);
    }
}

/// Ordered set of negotiable options for one channel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterTable {
    kind: ChannelKind,
    options: &'static [ChannelOption],
}

impl ParameterTable {
    /// Table for `kind`.
    pub fn for_kind(kind: ChannelKind) -> &'static ParameterTable {
        match kind {
            ChannelKind::Signalling => &SIGNALLING_PARAMETERS,
            ChannelKind::Media => &MEDIA_PARAMETERS,
        }
    }

    /// Channel kind this table configures.
    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Options in negotiation order.
    pub fn options(&self) -> &'static [ChannelOption] {
        self.options
    }

    /// Maximum inbound MTU, if offered.
    pub fn mtu_in(&self) -> Option<u16> {
        self.options.iter().find_map(|opt| match opt {
            ChannelOption::MtuIn(mtu) => Some(*mtu),
            _ => None,
        })
    }

    /// Minimum outbound MTU, if offered.
    pub fn mtu_out(&self) -> Option<u16> {
        self.options.iter().find_map(|opt| match opt {
            ChannelOption::MtuOut(mtu) => Some(*mtu),
            _ => None,
        })
    }

    /// Acceptable remote flush-timeout range, if offered.
    pub fn flush_in(&self) -> Option<FlushRange> {
        self.options.iter().find_map(|opt| match opt {
            ChannelOption::FlushIn(range) => Some(*range),
            _ => None,
        })
    }

    /// Acceptable local flush-timeout range, if offered.
    pub fn flush_out(&self) -> Option<FlushRange> {
        self.options.iter().find_map(|opt| match opt {
            ChannelOption::FlushOut(range) => Some(*range),
            _ => None,
        })
    }

    /// Render as the transport's auto-configuration word list.
    ///
    /// ```text
    /// SEPARATOR, (key, value words...)*, TERMINATOR
    /// ```
    ///
    /// MTUs take one word; each flush bound takes two words, high half first.
    pub fn to_words(&self) -> Vec<u16> {
        let mut out = Vec::with_capacity(2 + self.options.len() * 5);
        out.push(autopt::SEPARATOR);
        for option in self.options {
            option.push_words(&mut out);
        }
        out.push(autopt::TERMINATOR);
        out
    }

    /// Word list as big-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_words()
            .into_iter()
            .flat_map(u16::to_be_bytes)
            .collect()
    }
}

/// Signalling channel: low traffic, must never drop a packet.
pub static SIGNALLING_PARAMETERS: ParameterTable = ParameterTable {
    kind: ChannelKind::Signalling,
    options: &[
        ChannelOption::MtuIn(MAX_INBOUND_MTU),
        ChannelOption::MtuOut(SIGNALLING_MIN_OUTBOUND_MTU),
        ChannelOption::FlushIn(FlushRange::ANY),
        ChannelOption::FlushOut(FlushRange::INFINITE),
    ],
};

/// Media channel: stale audio is flushed after 25-30 ms.
pub static MEDIA_PARAMETERS: ParameterTable = ParameterTable {
    kind: ChannelKind::Media,
    options: &[
        ChannelOption::MtuIn(MAX_INBOUND_MTU),
        ChannelOption::MtuOut(MEDIA_MIN_OUTBOUND_MTU),
        ChannelOption::FlushIn(FlushRange::ANY),
        ChannelOption::FlushOut(FlushRange::new(
            MEDIA_FLUSH_OUT_MIN_US,
            MEDIA_FLUSH_OUT_MAX_US,
        )),
    ],
};
