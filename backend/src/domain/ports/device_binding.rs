//! Port for recording "remember this device" preferences.

use async_trait::async_trait;

use crate::domain::{DeviceId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by device binding adapters.
    pub enum DeviceBindingError {
        /// Binding store could not be reached.
        Unavailable { message: String } => "device binding store unavailable: {message}",
    }
}

/// Device binding collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceBindingStore: Send + Sync {
    /// Bind `device_id` to `user_id`, enabling PIN sign-in from that device.
    async fn remember_device(
        &self,
        user_id: &UserId,
        device_id: &DeviceId,
    ) -> Result<(), DeviceBindingError>;
}
