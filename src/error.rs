use thiserror::Error;

use crate::core::SeriesKind;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("length mismatch in {context}: left={left}, right={right}")]
    LengthMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },

    #[error("series kind mismatch: expected {expected}, found {actual}")]
    SeriesKindMismatch {
        expected: SeriesKind,
        actual: SeriesKind,
    },

    #[error("unknown series id: {0}")]
    UnknownSeries(u64),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ChartError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}
