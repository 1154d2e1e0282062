use hf_core::HfError;

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Caller mistakes detected by the engine.
///
/// Expected in-game rejections are reported through
/// [`ActionOutcome`](crate::actions::ActionOutcome) instead.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Core(#[from] HfError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("speed multiplier must be positive and finite, got {0}")]
    InvalidSpeed(f64),
}
