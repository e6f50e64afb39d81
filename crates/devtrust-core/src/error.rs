use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised around the engine: storage, configuration and input loading.
///
/// The scoring and matching functions themselves never fail; incomplete
/// history degrades to neutral results instead.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No record exists for the requested device
    #[error("device not found: {device_id}")]
    DeviceNotFound {
        /// Identifier that was looked up
        device_id: String,
    },

    /// Storage collaborator failed to load or persist a record
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration is invalid or could not be parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller supplied input the engine cannot use
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    /// Shorthand for [`RegistryError::DeviceNotFound`]
    pub fn not_found(device_id: impl Into<String>) -> Self {
        Self::DeviceNotFound {
            device_id: device_id.into(),
        }
    }

    /// Returns true if the error means the device does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound { .. })
    }
}
