//! Device geolocation.

use async_trait::async_trait;
use ecoleta_core::types::Position;

use crate::error::ClientError;

/// Source of the device's current position.
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Resolve the current position.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::LocationUnavailable`] when the position cannot
    /// be determined (permission denied, no fix, ...).
    async fn current_position(&self) -> Result<Position, ClientError>;
}

/// A location source that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Position);

#[async_trait]
impl LocationPort for FixedLocation {
    async fn current_position(&self) -> Result<Position, ClientError> {
        Ok(self.0)
    }
}

/// A location source for devices without geolocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocation;

#[async_trait]
impl LocationPort for UnavailableLocation {
    async fn current_position(&self) -> Result<Position, ClientError> {
        Err(ClientError::LocationUnavailable(
            "geolocation is not supported on this device".into(),
        ))
    }
}
