use thiserror::Error;

/// Errors raised while loading data, configuring or training a tree.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("invalid option `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unsupported data: {0}")]
    Unsupported(String),

    #[error("classifier has not been built yet")]
    NotTrained,

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CartError {
    pub(crate) fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        CartError::InvalidOption {
            option,
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        CartError::Parse {
            line,
            message: message.into(),
        }
    }
}
