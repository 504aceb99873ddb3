use tch::{TchError, Tensor};

/// Replicate a parameter along a new leading dimension.
/// Args:
///     param: tensor of shape `[d_0, .., d_k]`.
///     n_samples: size of the new leading dimension.
/// Return:
///     a fresh tensor of shape `[n_samples, d_0, .., d_k]`.
pub(crate) fn tile_leading(param: &Tensor, n_samples: i64) -> Result<Tensor, TchError> {
    let mut repeats = vec![n_samples];
    repeats.extend(std::iter::repeat(1).take(param.dim()));
    param.f_repeat(repeats.as_slice())
}

/// Replicate `mean` and `std` so they line up with a sample that carries
/// `n_samples` leading draws. For a single draw the parameters are returned
/// as fresh tensors of their own shape.
pub(crate) fn tile_params(
    mean: &Tensor,
    std: &Tensor,
    n_samples: i64,
) -> Result<(Tensor, Tensor), TchError> {
    if n_samples > 1 {
        Ok((tile_leading(mean, n_samples)?, tile_leading(std, n_samples)?))
    } else {
        Ok((mean.f_add_scalar(0.0)?, std.f_add_scalar(0.0)?))
    }
}

/// Number of leading draws a sample carries relative to a parameter:
/// the size of its first dimension when it has more dims than the parameter.
pub(crate) fn leading_draws(sample: &Tensor, param: &Tensor) -> i64 {
    if sample.dim() > param.dim() {
        sample.size()[0]
    } else {
        1
    }
}
