//! Unresponsive-media watchdog.
//!
//! Liveness is detected outside this crate (for example by repeated
//! transmission failures at the controller). When it is lost, the detector
//! calls [`SwatL2cap::report_media_unresponsive`] and the media channel is
//! torn down with a distinct notification, so the application can decide
//! whether to reconnect.

use tracing::{debug, warn};

use crate::channel::{ChannelState, TeardownCause};
use crate::core::{ChannelKind, DeviceId, L2capTransport};
use crate::manager::SwatL2cap;

impl<T: L2capTransport> SwatL2cap<T> {
    /// Force the media channel to `device` down after it stopped responding.
    ///
    /// Only acts on a connected channel. The teardown completes with
    /// [`SwatEvent::MediaUnresponsiveDisconnected`](crate::SwatEvent::MediaUnresponsiveDisconnected)
    /// instead of the ordinary `MediaDisconnected`. In any other state
    /// (idle, connecting, already disconnecting) this is a no-op.
    pub fn report_media_unresponsive(&mut self, device: DeviceId) {
        let state = self.media_state(device);
        if state != ChannelState::Connected {
            debug!(
                target: "swat.watchdog",
                device = %device,
                state = ?state,
                "Ignoring unresponsive report"
            );
            return;
        }

        warn!(
            target: "swat.watchdog",
            device = %device,
            "Media channel unresponsive, forcing disconnect"
        );
        self.close_channel(ChannelKind::Media, device, TeardownCause::Unresponsive);
    }
}
