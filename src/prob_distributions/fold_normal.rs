use super::base_distribution::{BaseDistribution, DistributionBase};
use super::config::DistributionConfig;
use super::scale::Scale;
use crate::error::Result;
use crate::misc::grad_flow::{detach_unless, ensure_requires_grad};
use crate::misc::tile_params::{leading_draws, tile_params};
use log::{debug, trace};
use std::f64::consts::{LN_2, PI};
use tch::{TchError, Tensor};

// ln(1 + exp(v)) without overflow for large v
fn softplus(v: &Tensor) -> std::result::Result<Tensor, TchError> {
    v.f_relu()?.f_add(&v.f_abs()?.f_neg()?.f_exp()?.f_log1p()?)
}

/// Folded normal distribution, supported on the non-negative reals.
pub struct FoldNormal {
    base: DistributionBase,
    mean: Tensor,
    std: Tensor,
    logstd: Tensor,
}

impl FoldNormal {
    pub fn new(mean: Tensor, scale: Scale, config: DistributionConfig) -> Result<Self> {
        debug!(
            "FoldNormal: mean shape {:?}, parameterized by {}",
            mean.size(),
            scale.kind_name()
        );
        let (std, logstd) = scale.resolve()?;
        Ok(FoldNormal {
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

    pub fn mean(&self) -> &Tensor {
        &self.mean
    }

    pub fn std(&self) -> &Tensor {
        &self.std
    }

    pub fn logstd(&self) -> &Tensor {
        &self.logstd
    }
}

impl BaseDistribution for FoldNormal {
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
            "FoldNormal: drawing shape {:?}, reparameterized: {}",
            shape,
            self.is_reparameterized()
        );

        let noise = Tensor::f_randn(shape.as_slice(), (self.dtype(), mean.device()))?;
        let sample = noise
            .f_mul(&std)?
            .f_add(&mean)?
            .f_to_kind(self.param_dtype())?;
        let sample = ensure_requires_grad(sample);
        if n_samples > 1 {
            assert_eq!(sample.size()[0], n_samples);
        }
        Ok(sample)
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
        trace!("FoldNormal: scoring sample of shape {:?}", sample.size());

        let x = sample.f_to_kind(self.dtype())?;
        let logstd = std.f_log()?;
        let c = -0.5 * (LN_2 + PI.ln());
        let precision = logstd.f_mul_scalar(-2.0)?.f_exp()?;
        // log(1) where x >= 0, log(0) = -inf elsewhere
        let mask = x.f_ge(0.0)?.f_to_kind(self.dtype())?.f_log()?;

        let quad = precision
            .f_mul(&x.f_sub(&mean)?.f_square()?)?
            .f_mul_scalar(0.5)?;
        let fold = softplus(&mean.f_mul(&x)?.f_mul(&precision)?.f_mul_scalar(-2.0)?)?;
        // every term already has the broadcast shape of `x - mean`
        let log_prob = (c - (&logstd + &quad)) + &fold + &mask;
        Ok(ensure_requires_grad(log_prob))
    }
}
