use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SpectralError>;

/// Failures reported by the estimator, the synthesizer and the fitter.
///
/// Every operation validates its inputs before producing output, so an `Err`
/// never comes with a partially built [`Spectrum`](crate::Spectrum) or
/// [`Signal`](crate::Signal).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectralError {
    /// A parameter is outside its valid domain (`nperseg > N`, overlap not in
    /// `[0, 1)`, `N < 2` for synthesis, non-positive power under a log, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Not enough samples, segments or spectral points to proceed.
    #[error("insufficient data: {what} needs at least {needed}, got {available}")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        available: usize,
    },
}

impl SpectralError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
