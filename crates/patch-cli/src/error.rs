//! Error types for patch-cli

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Blocks(#[from] patch_blocks::Error),

    /// Bad invocation, reported as-is
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// The source changed between load and commit.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Blocks(patch_blocks::Error::Fs(err)) => err.is_conflict(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_not_conflicts() {
        let error = CliError::user("no transform given");
        assert_eq!(error.to_string(), "no transform given");
        assert!(!error.is_conflict());
    }

    #[test]
    fn unknown_preset_message_passes_through() {
        let error = CliError::from(patch_blocks::Error::UnknownPreset("x".into()));
        assert_eq!(error.to_string(), "Unknown preset: x");
    }
}
