//! Adam Optimizer - Adaptive Moment Estimation
//!
//! Adam over a flat parameter vector.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

// =============================================================================
// Adam
// =============================================================================

/// Adam optimizer.
///
/// Update rule:
/// ```text
/// m_t = beta1 * m_{t-1} + (1 - beta1) * grad
/// v_t = beta2 * v_{t-1} + (1 - beta2) * grad^2
/// m_hat = m_t / (1 - beta1^t)
/// v_hat = v_t / (1 - beta2^t)
/// param = param - lr * m_hat / (sqrt(v_hat) + eps)
/// ```
#[derive(Debug, Clone)]
pub struct Adam {
    /// Learning rate.
    lr: f64,
    /// First moment decay rate.
    beta1: f64,
    /// Second moment decay rate.
    beta2: f64,
    /// Small constant for numerical stability.
    eps: f64,
    /// L2 penalty folded into the gradient.
    weight_decay: f64,
    /// Moment estimates, created on the first step.
    state: Option<AdamState>,
}

#[derive(Debug, Clone)]
struct AdamState {
    exp_avg: Vec<f64>,
    exp_avg_sq: Vec<f64>,
    step: usize,
}

impl Adam {
    /// Creates Adam with default betas `(0.9, 0.999)`.
    #[must_use]
    pub fn new(lr: f64) -> Self {
        Self::with_betas(lr, (0.9, 0.999))
    }

    /// Creates Adam with specified betas.
    #[must_use]
    pub fn with_betas(lr: f64, betas: (f64, f64)) -> Self {
        Self {
            lr,
            beta1: betas.0,
            beta2: betas.1,
            eps: 1e-8,
            weight_decay: 0.0,
            state: None,
        }
    }

    /// Builder method to set weight decay.
    #[must_use]
    pub fn weight_decay(mut self, weight_decay: f64) -> Self {
        self.weight_decay = weight_decay;
        self
    }

    /// Number of steps taken.
    pub fn steps(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.step)
    }

    /// Applies one update to `params` given `grads` of the same length.
    pub fn step(&mut self, params: &mut [f64], grads: &[f64]) {
        debug_assert_eq!(params.len(), grads.len());
        let n = params.len();
        let state = self.state.get_or_insert_with(|| AdamState {
            exp_avg: vec![0.0; n],
            exp_avg_sq: vec![0.0; n],
            step: 0,
        });
        state.step += 1;

        let bias_correction1 = 1.0 - self.beta1.powi(state.step as i32);
        let bias_correction2 = 1.0 - self.beta2.powi(state.step as i32);
        let step_size = self.lr / bias_correction1;

        for (i, p) in params.iter_mut().enumerate() {
            let g = grads[i] + self.weight_decay * *p;
            let m = &mut state.exp_avg[i];
            let v = &mut state.exp_avg_sq[i];
            *m = self.beta1 * *m + (1.0 - self.beta1) * g;
            *v = self.beta2 * *v + (1.0 - self.beta2) * g * g;

            let denom = (*v / bias_correction2).sqrt() + self.eps;
            *p -= step_size * *m / denom;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_moves_by_lr() {
        let mut adam = Adam::new(0.1);
        let mut params = vec![1.0, -1.0];
        adam.step(&mut params, &[2.0, -0.5]);
        // After bias correction the first step is lr * sign(grad).
        assert!((params[0] - 0.9).abs() < 1e-6);
        assert!((params[1] + 0.9).abs() < 1e-6);
        assert_eq!(adam.steps(), 1);
    }

    #[test]
    fn test_minimizes_quadratic() {
        let mut adam = Adam::new(0.05);
        let mut x = vec![3.0];
        for _ in 0..500 {
            let grad = [2.0 * (x[0] - 1.0)];
            adam.step(&mut x, &grad);
        }
        assert!((x[0] - 1.0).abs() < 5e-2, "x = {}", x[0]);
    }

    #[test]
    fn test_weight_decay_shrinks() {
        let mut plain = Adam::new(0.01);
        let mut decayed = Adam::new(0.01).weight_decay(1.0);
        let mut a = vec![1.0];
        let mut b = vec![1.0];
        for _ in 0..10 {
            plain.step(&mut a, &[0.0]);
            decayed.step(&mut b, &[0.0]);
        }
        assert_eq!(a[0], 1.0);
        assert!(b[0] < 1.0);
    }
}
