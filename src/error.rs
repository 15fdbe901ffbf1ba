use thiserror::Error;

/// Why a processing step did not run to completion.
///
/// When a step returns an error the trajectory holds its last good state;
/// see each step for what that state is.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not enough points in trajectory {stage}: {len} < 2")]
    NotEnoughPoints { stage: &'static str, len: usize },

    #[error("time step {0} s is below the minimum of {min} s", min = crate::resample::MIN_TIME_STEP)]
    TimeStepTooSmall(f64),

    #[error("spline resolution must be positive, got {0} m")]
    InvalidResolution(f64),

    #[error("velocity optimizer is not initialized")]
    MissingVelocityOptimizer,

    #[error("elastic band path smoother is not initialized")]
    MissingPathSmoother,

    #[error("failed to build interpolation trajectory")]
    SplineConstruction,

    #[error("failed to solve velocity optimization")]
    OptimizationFailed,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
