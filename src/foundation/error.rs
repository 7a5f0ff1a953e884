/// Convenience result type used across the crate.
pub type OverwriteResult<T> = Result<T, OverwriteError>;

/// Error taxonomy surfaced by the output nodes.
///
/// Every variant is fatal for the invocation that produced it; nothing is retried locally.
#[derive(thiserror::Error, Debug)]
pub enum OverwriteError {
    /// A parameter outside its declared range, or input data the writers cannot interpret.
    #[error("validation error: {0}")]
    Validation(String),

    /// The still-image codec failed while saving.
    #[error("Failed to save image: {0}")]
    Encode(String),

    /// The external encoder exited non-zero or could not be launched.
    #[error("{message}")]
    ExternalProcess {
        /// Exit code reported by the encoder, `None` when it never ran.
        code: Option<i32>,
        /// Operator-facing description.
        message: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OverwriteError {
    /// Build an [`OverwriteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OverwriteError::Encode`] value from the codec's cause.
    pub fn encode(cause: impl std::fmt::Display) -> Self {
        Self::Encode(cause.to_string())
    }

    /// Build an [`OverwriteError::ExternalProcess`] value for a non-zero exit.
    pub fn process_exit(program: &str, code: i32) -> Self {
        Self::ExternalProcess {
            code: Some(code),
            message: format!("{program} failed with return code {code}"),
        }
    }

    /// Build an [`OverwriteError::ExternalProcess`] value for a launch failure.
    pub fn process_launch(program: &str, cause: impl std::fmt::Display) -> Self {
        Self::ExternalProcess {
            code: None,
            message: format!("failed to launch {program} (is it installed and on PATH?): {cause}"),
        }
    }

    /// Build an [`OverwriteError::ExternalProcess`] value for a process killed by a signal.
    pub fn process_killed(program: &str) -> Self {
        Self::ExternalProcess {
            code: None,
            message: format!("{program} was terminated before reporting an exit code"),
        }
    }

    /// Exit code carried by an external process failure, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExternalProcess { code, .. } => *code,
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
