//! Errors raised by host capabilities.

/// A host capability that a component asked for is not available.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("{capability} is not available: {reason}")]
    Unavailable {
        capability: &'static str,
        reason: String,
    },

    #[error("viewport {width}x{height} is too small for a drawing surface")]
    EmptyViewport { width: u32, height: u32 },
}

impl CapabilityError {
    /// Shorthand for [`CapabilityError::Unavailable`].
    pub fn unavailable(capability: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            capability,
            reason: reason.into(),
        }
    }
}
