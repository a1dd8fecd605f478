use ndarray::{Array2, ArrayView2};

use crate::error::{ensure_finite, Result};
use super::{check_state_shapes, Optimizer};

/// Adam: two-moment adaptive gradient descent with bias correction.
///
/// Maintains decaying first and second moments of the gradient plus a step
/// counter; the update is `lr * m_hat / (sqrt(v_hat) + eps)`.
pub struct Adam {
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    /// First-moment decaying average
    m: Array2<f32>,
    /// Second-moment decaying average
    v: Array2<f32>,
    /// Step counter driving bias correction
    t: i32,
}

impl Adam {
    /// State sized to a `(rows, cols)` parameter with the standard
    /// hyperparameters: beta1 0.9, beta2 0.999, epsilon 1e-8.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_params(rows, cols, 0.9, 0.999, 1e-8)
    }

    pub fn with_params(rows: usize, cols: usize, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            beta1,
            beta2,
            epsilon,
            m: Array2::zeros((rows, cols)),
            v: Array2::zeros((rows, cols)),
            t: 0,
        }
    }
}

impl Optimizer for Adam {
    fn calculate_update(
        &mut self,
        value: ArrayView2<f32>,
        gradient: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<Array2<f32>> {
        check_state_shapes("Adam update", value, gradient, &self.m)?;

        self.t += 1;
        let beta1 = self.beta1;
        let beta2 = self.beta2;

        self.m
            .zip_mut_with(&gradient, |m, &g| *m = beta1 * *m + (1.0 - beta1) * g);
        self.v
            .zip_mut_with(&gradient, |v, &g| *v = beta2 * *v + (1.0 - beta2) * g * g);
        ensure_finite(&self.m, "Adam first-moment average")?;
        ensure_finite(&self.v, "Adam second-moment average")?;

        let m_hat = self.m.mapv(|m| m / (1.0 - beta1.powi(self.t)));
        let v_hat = self.v.mapv(|v| v / (1.0 - beta2.powi(self.t)));

        let update = m_hat / (v_hat.mapv(f32::sqrt) + self.epsilon) * learning_rate;
        ensure_finite(&update, "Adam update")?;
        Ok(update)
    }
}
