mod base_distribution;
mod config;
mod fold_normal;
mod normal;
mod scale;

pub use base_distribution::{BaseDistribution, DistributionBase};
pub use config::{DType, DistributionConfig};
pub use fold_normal::FoldNormal;
pub use normal::Normal;
pub use scale::Scale;
