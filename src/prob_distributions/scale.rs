use crate::error::{DistributionError, Result};
use tch::Tensor;

/// How the spread of a location-scale distribution is given.
pub enum Scale {
    Std(Tensor),
    LogStd(Tensor),
}

impl Scale {
    /// Build from optional keyword-style arguments; exactly one must be present.
    pub fn from_options(std: Option<Tensor>, logstd: Option<Tensor>) -> Result<Self> {
        match (std, logstd) {
            (Some(std), None) => Ok(Scale::Std(std)),
            (None, Some(logstd)) => Ok(Scale::LogStd(logstd)),
            (None, None) => Err(DistributionError::MissingScale),
            (Some(_), Some(_)) => Err(DistributionError::ConflictingScale),
        }
    }

    /// Resolve into `(std, logstd)`, deriving whichever was not supplied.
    pub(crate) fn resolve(self) -> Result<(Tensor, Tensor)> {
        match self {
            Scale::Std(std) => {
                let logstd = std.f_log()?;
                Ok((std, logstd))
            }
            Scale::LogStd(logstd) => {
                let std = logstd.f_exp()?;
                Ok((std, logstd))
            }
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Scale::Std(_) => "std",
            Scale::LogStd(_) => "logstd",
        }
    }
}
