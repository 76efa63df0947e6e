//! The single error type crossing module boundaries.
//!
//! Exit codes used by the `samarth` binary:
//!
//! - `2`: input/config/local IO problem (bad CSV, missing API key, unwritable path)
//! - `3`: no usable data
//! - `4`: upstream failure (remote API, chart rendering)

use thiserror::Error;

#[derive(Clone, Error)]
#[error("{message}")]
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

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = AppError::new(4, "Agmarknet request failed.");
        assert_eq!(err.to_string(), "Agmarknet request failed.");
        assert_eq!(err.exit_code(), 4);
    }
}
