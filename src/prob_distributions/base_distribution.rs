use super::config::DistributionConfig;
use crate::error::{DistributionError, Result};
use tch::{Kind, Tensor};

/// State every distribution carries: its configuration and the last drawn sample.
pub struct DistributionBase {
    config: DistributionConfig,
    sample_cache: Option<Tensor>,
}

impl DistributionBase {
    pub fn new(config: DistributionConfig) -> Self {
        DistributionBase {
            config,
            sample_cache: None,
        }
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    pub fn sample_cache(&self) -> Option<&Tensor> {
        self.sample_cache.as_ref()
    }

    fn cache(&mut self, sample: Tensor) {
        self.sample_cache = Some(sample);
    }
}

/// Contract shared by all distributions.
///
/// Implementors provide [`draw`](BaseDistribution::draw) and
/// [`score`](BaseDistribution::score); sampling with caching, scoring of the
/// cached sample and event-wise reduction come for free.
pub trait BaseDistribution {
    fn base(&self) -> &DistributionBase;
    fn base_mut(&mut self) -> &mut DistributionBase;

    /// Draw `n_samples` samples. The result has shape `[n_samples, ..]` when
    /// `n_samples > 1` and the plain parameter shape otherwise.
    fn draw(&self, n_samples: i64) -> Result<Tensor>;

    /// Elementwise log-density of `sample`, no reduction.
    fn score(&self, sample: &Tensor) -> Result<Tensor>;

    fn dtype(&self) -> Kind {
        self.base().config().dtype.into()
    }

    fn param_dtype(&self) -> Kind {
        self.base().config().param_dtype.into()
    }

    fn is_continuous(&self) -> bool {
        self.base().config().is_continuous
    }

    fn is_reparameterized(&self) -> bool {
        self.base().config().is_reparameterized
    }

    fn group_ndims(&self) -> usize {
        self.base().config().group_ndims
    }

    fn sample_cache(&self) -> Option<&Tensor> {
        self.base().sample_cache()
    }

    /// Draw samples and remember them for a later [`log_prob`](BaseDistribution::log_prob).
    fn sample(&mut self, n_samples: i64) -> Result<Tensor> {
        if n_samples < 1 {
            return Err(DistributionError::InvalidSampleCount { n_samples });
        }
        let sample = self.draw(n_samples)?;
        self.base_mut().cache(sample.shallow_clone());
        Ok(sample)
    }

    /// Log-density of `sample`, or of the cached sample when `None`.
    fn log_prob(&self, sample: Option<&Tensor>) -> Result<Tensor> {
        match sample {
            Some(sample) => self.score(sample),
            None => {
                let cached = self
                    .sample_cache()
                    .ok_or(DistributionError::NoCachedSample)?;
                self.score(cached)
            }
        }
    }

    fn prob(&self, sample: Option<&Tensor>) -> Result<Tensor> {
        Ok(self.log_prob(sample)?.f_exp()?)
    }

    /// `log_prob` summed over the trailing `group_ndims` dimensions.
    fn group_log_prob(&self, sample: Option<&Tensor>) -> Result<Tensor> {
        let log_prob = self.log_prob(sample)?;
        let group_ndims = self.group_ndims();
        if group_ndims == 0 {
            return Ok(log_prob);
        }
        let ndim = log_prob.dim();
        if group_ndims > ndim {
            return Err(DistributionError::InvalidGroupNdims { group_ndims, ndim });
        }
        let dims: Vec<i64> = (1..=group_ndims as i64).map(|d| -d).collect();
        Ok(log_prob.f_sum_dim_intlist(dims.as_slice(), false, log_prob.kind())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prob_distributions::config::DType;
    use tch::Device;

    // Uniform on [0, 1) with density 1, enough to exercise the provided methods.
    struct UnitUniform {
        base: DistributionBase,
        shape: Vec<i64>,
    }

    impl BaseDistribution for UnitUniform {
        fn base(&self) -> &DistributionBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut DistributionBase {
            &mut self.base
        }

        fn draw(&self, n_samples: i64) -> Result<Tensor> {
            let mut shape = self.shape.clone();
            if n_samples > 1 {
                shape.insert(0, n_samples);
            }
            Ok(Tensor::f_rand(shape.as_slice(), (self.dtype(), Device::Cpu))?)
        }

        fn score(&self, sample: &Tensor) -> Result<Tensor> {
            Ok(sample.f_zeros_like()?)
        }
    }

    fn uniform(group_ndims: usize) -> UnitUniform {
        let config = DistributionConfig::default()
            .with_dtype(DType::Double)
            .with_group_ndims(group_ndims);
        UnitUniform {
            base: DistributionBase::new(config),
            shape: vec![2, 3],
        }
    }

    #[test]
    fn test_accessors() {
        let dist = uniform(1);
        assert_eq!(dist.dtype(), Kind::Double);
        assert_eq!(dist.param_dtype(), Kind::Float);
        assert!(dist.is_continuous());
        assert!(dist.is_reparameterized());
        assert_eq!(dist.group_ndims(), 1);
        assert!(dist.sample_cache().is_none());
    }

    #[test]
    fn test_sample_caches() {
        let mut dist = uniform(0);
        let sample = dist.sample(1).unwrap();
        assert_eq!(sample.size(), vec![2, 3]);
        assert_eq!(dist.sample_cache().unwrap(), &sample);

        let sample = dist.sample(4).unwrap();
        assert_eq!(sample.size(), vec![4, 2, 3]);
        assert_eq!(dist.sample_cache().unwrap(), &sample);
    }

    #[test]
    fn test_invalid_sample_count() {
        let mut dist = uniform(0);
        let result = dist.sample(0);
        assert!(matches!(
            result,
            Err(DistributionError::InvalidSampleCount { n_samples: 0 })
        ));
        assert!(dist.sample_cache().is_none());
    }

    #[test]
    fn test_log_prob_without_cache() {
        let dist = uniform(0);
        assert!(matches!(
            dist.log_prob(None),
            Err(DistributionError::NoCachedSample)
        ));
    }

    #[test]
    fn test_prob() {
        let mut dist = uniform(0);
        dist.sample(1).unwrap();
        let prob = dist.prob(None).unwrap();
        assert!((prob.sum(Kind::Double).double_value(&[]) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_group_log_prob() {
        let mut dist = uniform(2);
        dist.sample(5).unwrap();
        let log_prob = dist.group_log_prob(None).unwrap();
        assert_eq!(log_prob.size(), vec![5]);

        let dist = uniform(3);
        let x = Tensor::zeros(&[2, 3], (Kind::Double, Device::Cpu));
        assert!(matches!(
            dist.group_log_prob(Some(&x)),
            Err(DistributionError::InvalidGroupNdims {
                group_ndims: 3,
                ndim: 2
            })
        ));
    }
}
