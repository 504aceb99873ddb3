use tch::Tensor;

// Returns a new view; the input tensor keeps its own gradient tracking.
pub(crate) fn detach_unless(t: &Tensor, reparameterized: bool) -> Tensor {
    if reparameterized {
        t.shallow_clone()
    } else {
        t.detach()
    }
}

/// Mark a freshly computed tensor as differentiable downstream.
/// Tensors already attached to the graph are returned untouched.
pub(crate) fn ensure_requires_grad(t: Tensor) -> Tensor {
    if t.requires_grad() {
        t
    } else {
        t.set_requires_grad(true)
    }
}
