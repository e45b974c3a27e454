//! Channel manager configuration.

use crate::core::constants::{DEFAULT_MAX_DEVICES, DEFAULT_MEDIA_PSM, DEFAULT_SIGNALLING_PSM};
use crate::core::{ChannelKind, Psm, SwatError, SwatResult};

/// Channel manager configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwatConfig {
    /// PSM reserved for the signalling channel.
    pub signalling_psm: Psm,

    /// PSM reserved for the media channel.
    pub media_psm: Psm,

    /// Maximum number of remote devices tracked at once.
    pub max_devices: usize,
}

impl Default for SwatConfig {
    fn default() -> Self {
        Self {
            signalling_psm: Psm(DEFAULT_SIGNALLING_PSM),
            media_psm: Psm(DEFAULT_MEDIA_PSM),
            max_devices: DEFAULT_MAX_DEVICES,
        }
    }
}

impl SwatConfig {
    /// PSM configured for `kind`.
    pub fn psm(&self, kind: ChannelKind) -> Psm {
        match kind {
            ChannelKind::Signalling => self.signalling_psm,
            ChannelKind::Media => self.media_psm,
        }
    }

    /// Check the configuration for values the transport would refuse.
    pub fn validate(&self) -> SwatResult<()> {
        for kind in [ChannelKind::Signalling, ChannelKind::Media] {
            let psm = self.psm(kind);
            if !psm.is_valid() {
                return Err(SwatError::Config(format!("invalid {kind} PSM {psm}")));
            }
        }
        if self.signalling_psm == self.media_psm {
            return Err(SwatError::Config(format!(
                "signalling and media share PSM {}",
                self.media_psm
            )));
        }
        if self.max_devices == 0 {
            return Err(SwatError::Config("max_devices must be at least 1".into()));
        }
        Ok(())
    }
}

/// Builder for a [`SwatConfig`].
#[derive(Debug)]
pub struct SwatConfigBuilder {
    config: SwatConfig,
}

impl SwatConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: SwatConfig::default(),
        }
    }

    /// Set the signalling PSM.
    pub fn signalling_psm(mut self, psm: u16) -> Self {
        self.config.signalling_psm = Psm(psm);
        self
    }

    /// Set the media PSM.
    pub fn media_psm(mut self, psm: u16) -> Self {
        self.config.media_psm = Psm(psm);
        self
    }

    /// Set the maximum number of tracked devices.
    pub fn max_devices(mut self, max: usize) -> Self {
        self.config.max_devices = max;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> SwatResult<SwatConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SwatConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SwatConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.psm(ChannelKind::Signalling), Psm(0x1001));
        assert_eq!(config.psm(ChannelKind::Media), Psm(0x1003));
    }

    #[test]
    fn test_builder_rejects_shared_psm() {
        let result = SwatConfigBuilder::new()
            .signalling_psm(0x1005)
            .media_psm(0x1005)
            .build();
        assert!(matches!(result, Err(SwatError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_psm() {
        let result = SwatConfigBuilder::new().media_psm(0x1002).build();
        assert!(matches!(result, Err(SwatError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let result = SwatConfigBuilder::new().max_devices(0).build();
        assert!(matches!(result, Err(SwatError::Config(_))));
    }

    #[test]
    fn test_builder_overrides() {
        let config = SwatConfigBuilder::new()
            .signalling_psm(0x1011)
            .media_psm(0x1013)
            .max_devices(2)
            .build()
            .expect("valid config");
        assert_eq!(config.signalling_psm, Psm(0x1011));
        assert_eq!(config.media_psm, Psm(0x1013));
        assert_eq!(config.max_devices, 2);
    }
}
