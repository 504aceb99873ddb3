use tch::TchError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DistributionError>;

/// Errors raised while building, sampling or scoring a distribution.
#[derive(Debug, Error)]
pub enum DistributionError {
    /// Neither `std` nor `logstd` was given.
    #[error("either `std` or `logstd` must be supplied")]
    MissingScale,

    /// Both `std` and `logstd` were given.
    #[error("only one of `std` and `logstd` may be supplied")]
    ConflictingScale,

    /// `log_prob` was called without a sample before anything was drawn.
    #[error("no cached sample: call `sample` first or pass a sample explicitly")]
    NoCachedSample,

    #[error("n_samples must be at least 1, got {n_samples}")]
    InvalidSampleCount { n_samples: i64 },

    #[error("cannot reduce {group_ndims} trailing dims of a {ndim}-dim tensor")]
    InvalidGroupNdims { group_ndims: usize, ndim: usize },

    /// Failure reported by libtorch, shape mismatches included.
    #[error(transparent)]
    Tensor(#[from] TchError),
}
