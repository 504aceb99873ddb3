use super::base_distribution::{BaseDistribution, DistributionBase};
use super::config::DistributionConfig;
use super::scale::Scale;
use crate::error::Result;
use crate::misc::grad_flow::{detach_unless, ensure_requires_grad};
use crate::misc::tile_params::{leading_draws, tile_params};
use log::{debug, trace};
use tch::{Device, Kind, Tensor};

/// Diagonal normal distribution.
pub struct Normal {
    base: DistributionBase,
    mean: Tensor,
    std: Tensor,
    logstd: Tensor,
}

impl Normal {
    pub fn new(mean: Tensor, scale: Scale, config: DistributionConfig) -> Result<Self> {
        debug!(
            "Normal: mean shape {:?}, parameterized by {}",
            mean.size(),
            scale.kind_name()
        );
        let (std, logstd) = scale.resolve()?;
        Ok(Normal {
            base: DistributionBase::new(config),
            mean,
            std,
            logstd,
        })
    }

    pub fn from_options(
        mean: Tensor,
        std: Option<Tensor>,
        logstd: Option<Tensor>,
        config: DistributionConfig,
    ) -> Result<Self> {
        Self::new(mean, Scale::from_options(std, logstd)?, config)
    }

    /// N(0, I) of the given shape, e.g. the prior of a VAE latent.
    pub fn standard(shape: &[i64], config: DistributionConfig, device: Device) -> Result<Self> {
        let kind: Kind = config.param_dtype.into();
        let mean = Tensor::f_zeros(shape, (kind, device))?;
        let logstd = Tensor::f_zeros(shape, (kind, device))?;
        Self::new(mean, Scale::LogStd(logstd), config)
    }

    pub fn mean(&self) -> &Tensor {
        &self.mean
    }

    pub fn std(&self) -> &Tensor {
        &self.std
    }

    pub fn logstd(&self) -> &Tensor {
        &self.logstd
    }

    pub fn most_probable(&self) -> Tensor {
        self.mean.shallow_clone()
    }

    /// Elementwise differential entropy, 0.5 * ln(2 * pi * e) + logstd.
    pub fn entropy(&self) -> Result<Tensor> {
        let log_term = 0.5 * ((2.0 * std::f64::consts::PI).ln() + 1.0);
        Ok(self.logstd.f_add_scalar(log_term)?)
    }

    /// Elementwise KL(self || q).
    pub fn kl(&self, q: &Normal) -> Result<Tensor> {
        let mean_diff = self.mean.f_sub(&q.mean)?.f_square()?;
        let term1 = q.logstd.f_sub(&self.logstd)?;
        let term2 = self
            .std
            .f_square()?
            .f_add(&mean_diff)?
            .f_div(&q.std.f_square()?.f_mul_scalar(2.0)?)?;
        Ok(term1.f_add(&term2)?.f_sub_scalar(0.5)?)
    }
}

impl BaseDistribution for Normal {
    fn base(&self) -> &DistributionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DistributionBase {
        &mut self.base
    }

    fn draw(&self, n_samples: i64) -> Result<Tensor> {
        let mut shape = self.mean.size();
        if n_samples > 1 {
            shape.insert(0, n_samples);
        }
        let (mean, std) = tile_params(&self.mean, &self.std, n_samples)?;
        let mean = detach_unless(&mean, self.is_reparameterized());
        let std = detach_unless(&std, self.is_reparameterized());
        debug!(
            "Normal: drawing shape {:?}, reparameterized: {}",
            shape,
            self.is_reparameterized()
        );

        let noise = Tensor::f_randn(shape.as_slice(), (self.dtype(), mean.device()))?;
        let sample = mean
            .f_add(&std.f_mul(&noise)?)?
            .f_to_kind(self.param_dtype())?;
        Ok(ensure_requires_grad(sample))
    }

    fn score(&self, sample: &Tensor) -> Result<Tensor> {
        let n_samples = leading_draws(sample, &self.mean);
        let (mean, std) = if n_samples > 1 {
            tile_params(&self.mean, &self.std, n_samples)?
        } else {
            (self.mean.shallow_clone(), self.std.shallow_clone())
        };
        let mean = detach_unless(&mean, self.is_reparameterized());
        let std = detach_unless(&std, self.is_reparameterized());
        trace!("Normal: scoring sample of shape {:?}", sample.size());

        let x = sample.f_to_kind(self.dtype())?;
        let logstd = std.f_log()?;
        let diff = x.f_sub(&mean)?.f_square()?;
        let log_prob = diff
            .f_div(&std.f_square()?)?
            .f_mul_scalar(-0.5)?
            .f_sub(&logstd)?
            .f_add_scalar(-0.5 * (2.0 * std::f64::consts::PI).ln())?;
        Ok(ensure_requires_grad(log_prob))
    }
}
