//! Error types for the SWAT channel manager.

use thiserror::Error;

use super::types::{ChannelKind, DeviceId, Psm};

/// Errors the transport can return when reserving a PSM.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// Another service already owns the PSM.
    #[error("PSM {0} already reserved")]
    AlreadyReserved(Psm),

    /// The transport has no room for another registration.
    #[error("no resources to reserve PSM {0}")]
    NoResources(Psm),
}

/// Why an outgoing or accepted connect attempt did not complete.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    /// Remote device refused the connection.
    #[error("refused by remote device")]
    Refused,

    /// Local or remote transport lacked resources.
    #[error("insufficient resources")]
    NoResources,

    /// Security requirements were not met.
    #[error("security block")]
    SecurityBlock,

    /// No response within the transport's connect timeout.
    #[error("connect timed out")]
    Timeout,

    /// Remote tore the link down while the attempt was in flight.
    #[error("remote disconnected during connect")]
    RemoteDisconnected,

    /// Any other transport status code.
    #[error("transport status {0:#06x}")]
    Other(u16),
}

/// Errors returned synchronously by the channel manager.
#[derive(Debug, Error)]
pub enum SwatError {
    /// A connect attempt or channel already exists for the device.
    #[error("{kind} channel to {device} already in progress")]
    AlreadyInProgress {
        /// Device the request was for.
        device: DeviceId,
        /// Channel the request was for.
        kind: ChannelKind,
    },

    /// The channel is not connected.
    #[error("{kind} channel to {device} not connected")]
    NotConnected {
        /// Device the request was for.
        device: DeviceId,
        /// Channel the request was for.
        kind: ChannelKind,
    },

    /// No room in the device registry.
    #[error("device registry full ({max} devices)")]
    RegistryFull {
        /// Configured capacity.
        max: usize,
    },

    /// PSM reservation failed during bring-up.
    #[error("failed to register {kind} PSM: {source}")]
    Registration {
        /// Channel whose PSM could not be reserved.
        kind: ChannelKind,
        /// Transport error.
        #[source]
        source: ReservationError,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The service task owning the manager has stopped.
    #[error("channel manager shut down")]
    Shutdown,
}

impl SwatError {
    /// Check if this is a local rejection: the request was refused because of
    /// the channel's current state and nothing was sent to the transport.
    pub fn is_local_rejection(&self) -> bool {
        matches!(
            self,
            SwatError::AlreadyInProgress { .. }
                | SwatError::NotConnected { .. }
                | SwatError::RegistryFull { .. }
        )
    }

    /// Check if this error prevents the manager from starting.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SwatError::Registration { .. } | SwatError::Config(_))
    }
}

/// Result type for channel manager operations.
pub type SwatResult<T> = Result<T, SwatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_rejection_errors() {
        let busy = SwatError::AlreadyInProgress {
            device: DeviceId(1),
            kind: ChannelKind::Media,
        };
        assert!(busy.is_local_rejection());
        assert!(!busy.is_fatal());

        assert!(SwatError::RegistryFull { max: 4 }.is_local_rejection());
    }

    #[test]
    fn test_fatal_errors() {
        let err = SwatError::Registration {
            kind: ChannelKind::Signalling,
            source: ReservationError::AlreadyReserved(Psm(0x1001)),
        };
        assert!(err.is_fatal());
        assert!(!err.is_local_rejection());
        assert_eq!(
            err.to_string(),
            "failed to register signalling PSM: PSM 0x1001 already reserved"
        );

        assert!(SwatError::Config("bad".into()).is_fatal());
    }

    #[test]
    fn test_connect_failure_display() {
        assert_eq!(ConnectFailure::Other(0x00ff).to_string(), "transport status 0x00ff");
    }
}
