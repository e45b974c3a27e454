//! Protocol constants for the SWAT L2CAP channels.
//!
//! MTU and flush-timeout bounds are part of the contract with the remote
//! peer and MUST NOT be changed.

// =============================================================================
// PROTOCOL / SERVICE MULTIPLEXERS
// =============================================================================

/// Default PSM reserved for the SWAT signalling channel.
pub const DEFAULT_SIGNALLING_PSM: u16 = 0x1001;

/// Default PSM reserved for the SWAT media channel.
pub const DEFAULT_MEDIA_PSM: u16 = 0x1003;

/// Default number of remote devices tracked at the same time.
pub const DEFAULT_MAX_DEVICES: usize = 4;

// =============================================================================
// MTU BOUNDS (bytes)
// =============================================================================

/// Maximum inbound MTU offered on both channels.
pub const MAX_INBOUND_MTU: u16 = 0x037F;

/// Minimum acceptable outbound MTU on the signalling channel.
pub const SIGNALLING_MIN_OUTBOUND_MTU: u16 = 0x0030;

/// Minimum acceptable outbound MTU on the media channel.
pub const MEDIA_MIN_OUTBOUND_MTU: u16 = 0x0032;

// =============================================================================
// FLUSH TIMEOUTS (microseconds)
// =============================================================================

/// Zero flush timeout.
pub const FLUSH_TIMEOUT_ZERO: u32 = 0x0000_0000;

/// Infinite flush timeout (never flush, retransmit until delivered).
pub const FLUSH_TIMEOUT_INFINITE: u32 = 0xFFFF_FFFF;

/// Lower bound of the local media flush timeout.
pub const MEDIA_FLUSH_OUT_MIN_US: u32 = 25_000;

/// Upper bound of the local media flush timeout.
pub const MEDIA_FLUSH_OUT_MAX_US: u32 = 30_000;

// =============================================================================
// AUTO-CONFIGURATION WORDS
// =============================================================================

/// Word keys of the transport's auto-configuration list.
pub mod autopt {
    /// Marks the start of an option block.
    pub const SEPARATOR: u16 = 0xFF00;
    /// Maximum inbound MTU follows (one word).
    pub const MTU_IN: u16 = 0x0001;
    /// Minimum acceptable outbound MTU follows (one word).
    pub const MTU_OUT: u16 = 0x0002;
    /// Acceptable remote flush-timeout range follows (two 32-bit values).
    pub const FLUSH_IN: u16 = 0x0003;
    /// Acceptable local flush-timeout range follows (two 32-bit values).
    pub const FLUSH_OUT: u16 = 0x0004;
    /// Marks the end of the list.
    pub const TERMINATOR: u16 = 0xFF01;
}
