use thiserror::Error;

/// Failures raised by the configurator core.
///
/// Each variant carries its own recovery policy:
/// - `Configuration` fails fast at bind time
/// - `OutOfRange` is recovered by callers that fall back to the raw value
/// - `PayloadParse` and `Transport` leave the UI in its pre-submit state
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiamondError {
    #[error("invalid slider configuration for {attribute}: {reason}")]
    Configuration { attribute: String, reason: String },

    #[error("value {value} of {attribute} maps to label index {index}, outside 0..{len}")]
    OutOfRange {
        attribute: String,
        value: f64,
        index: i64,
        len: usize,
    },

    #[error("malformed pricing response: {0}")]
    PayloadParse(String),

    #[error("pricing request failed: {0}")]
    Transport(String),
}

impl DiamondError {
    pub fn configuration(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Exit code used when the error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration { .. } => 2,
            Self::OutOfRange { .. } | Self::PayloadParse(_) | Self::Transport(_) => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DiamondError> for AppError {
    fn from(err: DiamondError) -> Self {
        Self::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_exit_codes() {
        let config: AppError = DiamondError::configuration("color", "needs two labels").into();
        assert_eq!(config.exit_code(), 2);
        assert!(config.to_string().contains("color"));

        let parse: AppError = DiamondError::PayloadParse("missing field `range`".to_string()).into();
        assert_eq!(parse.exit_code(), 4);
    }
}
