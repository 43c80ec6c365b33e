//! Registration behavior configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_ADMISSION_TIMEOUT_MS: u64 = 60_000;

/// Registration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationConfig {
    /// Longest wait, in milliseconds, to enter an offering's admission
    /// section before the attempt is abandoned
    #[serde(default = "default_admission_timeout")]
    pub admission_timeout_ms: u64,
}

impl RegistrationConfig {
    /// Admission timeout as Duration
    pub fn admission_timeout(&self) -> Duration {
        Duration::from_millis(self.admission_timeout_ms)
    }

    /// Validate registration configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.admission_timeout_ms == 0 || self.admission_timeout_ms > MAX_ADMISSION_TIMEOUT_MS
        {
            return Err(ValidationError::InvalidAdmissionTimeout);
        }
        Ok(())
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            admission_timeout_ms: default_admission_timeout(),
        }
    }
}

fn default_admission_timeout() -> u64 {
    5_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_defaults() {
        let config = RegistrationConfig::default();
        assert_eq!(config.admission_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = RegistrationConfig {
            admission_timeout_ms: 0,
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidAdmissionTimeout)
        );
    }

    #[test]
    fn test_excessive_timeout_rejected() {
        let config = RegistrationConfig {
            admission_timeout_ms: 120_000,
        };
        assert!(config.validate().is_err());
    }
}
