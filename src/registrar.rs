//! PSM registration.
//!
//! Both SWAT PSMs are reserved once, while the manager is being built. A
//! collision is not transient, so there is no retry.

use tracing::{error, info};

use crate::config::SwatConfig;
use crate::core::{ChannelKind, L2capTransport, Psm, SwatError, SwatResult};

/// PSMs reserved with the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredPsms {
    /// Signalling channel PSM.
    pub signalling: Psm,
    /// Media channel PSM.
    pub media: Psm,
}

impl RegisteredPsms {
    /// PSM reserved for `kind`.
    pub fn get(&self, kind: ChannelKind) -> Psm {
        match kind {
            ChannelKind::Signalling => self.signalling,
            ChannelKind::Media => self.media,
        }
    }

    /// Channel kind an inbound PSM routes to.
    pub fn kind_for(&self, psm: Psm) -> Option<ChannelKind> {
        if psm == self.signalling {
            Some(ChannelKind::Signalling)
        } else if psm == self.media {
            Some(ChannelKind::Media)
        } else {
            None
        }
    }
}

/// Reserve the signalling and media PSMs.
pub(crate) fn register_channels<T: L2capTransport>(
    config: &SwatConfig,
    transport: &mut T,
) -> SwatResult<RegisteredPsms> {
    config.validate()?;

    let signalling = reserve(transport, ChannelKind::Signalling, config.signalling_psm)?;
    let media = reserve(transport, ChannelKind::Media, config.media_psm)?;

    info!(
        target: "swat.registrar",
        signalling_psm = %signalling,
        media_psm = %media,
        "Registered SWAT PSMs"
    );

    Ok(RegisteredPsms { signalling, media })
}

fn reserve<T: L2capTransport>(transport: &mut T, kind: ChannelKind, psm: Psm) -> SwatResult<Psm> {
    transport.reserve_multiplexer(kind, psm).map_err(|source| {
        error!(
            target: "swat.registrar",
            kind = %kind,
            psm = %psm,
            error = %source,
            "PSM registration failed"
        );
        SwatError::Registration { kind, source }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SwatConfigBuilder;
    use crate::core::ReservationError;
    use crate::manager::SwatL2cap;
    use crate::mock::{MockTransport, TransportCall};

    #[test]
    fn test_registers_both_psms_once() {
        let transport = MockTransport::new();
        let swat = SwatL2cap::register(SwatConfig::default(), transport.clone()).unwrap();

        assert_eq!(
            transport.calls(),
            vec![
                TransportCall::Reserve {
                    kind: ChannelKind::Signalling,
                    psm: Psm(0x1001)
                },
                TransportCall::Reserve {
                    kind: ChannelKind::Media,
                    psm: Psm(0x1003)
                },
            ]
        );
        assert_eq!(swat.psms().get(ChannelKind::Media), Psm(0x1003));
    }

    #[test]
    fn test_registration_failure_is_fatal() {
        let transport = MockTransport::new();
        transport.refuse_reservation(
            ChannelKind::Media,
            ReservationError::AlreadyReserved(Psm(0x1003)),
        );

        let err = SwatL2cap::register(SwatConfig::default(), transport.clone()).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            SwatError::Registration {
                kind: ChannelKind::Media,
                source: ReservationError::AlreadyReserved(_)
            }
        ));
        // No retry
        assert_eq!(transport.calls().len(), 2);
    }

    #[test]
    fn test_signalling_failure_stops_before_media() {
        let transport = MockTransport::new();
        transport.refuse_reservation(
            ChannelKind::Signalling,
            ReservationError::NoResources(Psm(0x1001)),
        );

        assert!(SwatL2cap::register(SwatConfig::default(), transport.clone()).is_err());
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn test_invalid_config_reserves_nothing() {
        let transport = MockTransport::new();
        let config = SwatConfig {
            max_devices: 0,
            ..SwatConfig::default()
        };

        let err = SwatL2cap::register(config, transport.clone()).unwrap_err();
        assert!(matches!(err, SwatError::Config(_)));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_custom_psms_route_inbound() {
        let config = SwatConfigBuilder::new()
            .signalling_psm(0x1011)
            .media_psm(0x1013)
            .build()
            .unwrap();
        let swat = SwatL2cap::register(config, MockTransport::new()).unwrap();

        let psms = swat.psms();
        assert_eq!(psms.kind_for(Psm(0x1011)), Some(ChannelKind::Signalling));
        assert_eq!(psms.kind_for(Psm(0x1013)), Some(ChannelKind::Media));
        assert_eq!(psms.kind_for(Psm(0x1001)), None);
    }
}
