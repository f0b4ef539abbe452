//! Error types for the ambient engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while building or playing a soundscape.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A preset or layer description is invalid. Raised by graph
    /// construction before anything is attached to the master gain.
    #[error("invalid configuration: {reason}")]
    Configuration {
        /// What was wrong.
        reason: String,
    },

    /// No preset is registered under this name.
    #[error("unknown preset: {name}")]
    UnknownPreset {
        /// Requested preset name.
        name: String,
    },

    /// The audio subsystem could not be initialized (no device, denied,
    /// unsupported environment).
    #[error("audio platform unavailable: {reason}")]
    PlatformUnavailable {
        /// Platform-supplied description.
        reason: String,
    },

    /// An output stream could not be built or started on an opened context.
    #[error("audio stream failed: {reason}")]
    Stream {
        /// Platform-supplied description.
        reason: String,
    },

    /// Stop was requested on a generator that never started or already
    /// stopped. Always swallowed during teardown.
    #[error("generator is not running")]
    GeneratorNotRunning,
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates a platform-unavailable error.
    pub fn platform(reason: impl Into<String>) -> Self {
        Self::PlatformUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a stream error.
    pub fn stream(reason: impl Into<String>) -> Self {
        Self::Stream {
            reason: reason.into(),
        }
    }

    /// Whether this error comes from the audio platform rather than from
    /// the preset. Platform errors may go away on a later attempt (e.g.
    /// after a user gesture), configuration errors never do.
    pub fn is_platform(&self) -> bool {
        matches!(self, Self::PlatformUnavailable { .. } | Self::Stream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_errors_are_classified() {
        assert!(EngineError::platform("no device").is_platform());
        assert!(EngineError::stream("build failed").is_platform());
        assert!(!EngineError::config("bad").is_platform());
        assert!(!EngineError::GeneratorNotRunning.is_platform());
    }

    #[test]
    fn messages_include_reason() {
        let err = EngineError::config("frequency must be positive");
        assert_eq!(
            err.to_string(),
            "invalid configuration: frequency must be positive"
        );
    }
}
