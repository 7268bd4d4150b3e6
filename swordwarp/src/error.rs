use thiserror::Error;

/// Unrecoverable problems detected while assembling a [`crate::Session`].
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no ground probe configured")]
    MissingGroundProbe,
    #[error("no rigid body configured for the {0}")]
    MissingBody(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A configuration value that would silently produce wrong physics.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`{field}` must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("`{field}` must be finite")]
    NotFinite { field: &'static str },
    #[error("ground mask is empty")]
    EmptyGroundMask,
    #[error("warp curve: {0}")]
    Curve(&'static str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler has been shut down")]
    ShutDown,
}
