use ndarray::{Array2, ArrayView2};

use crate::error::{ensure_finite, Result};
use super::{check_state_shapes, Optimizer};

/// AdaDelta: adaptive gradient descent with running averages of squared
/// gradients and squared updates.
///
/// `EG` tracks the decaying mean square of gradients up to the current step;
/// `ED` tracks the decaying mean square of *applied updates* and therefore
/// lags one step behind `EG`. The update is
/// `sqrt(ED + eps) / sqrt(EG + eps) * gradient`. The rule is self-scaling:
/// the learning-rate argument is accepted but unused.
pub struct AdaDelta {
    decay: f32,
    epsilon: f32,
    /// Decaying average of squared gradients, E[g²]
    eg: Array2<f32>,
    /// Decaying average of squared updates, E[Δ²]
    ed: Array2<f32>,
    /// Update computed by the previous step
    delta: Array2<f32>,
}

impl AdaDelta {
    /// State sized to a `(rows, cols)` parameter, decay 0.9, epsilon 1e-8.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_params(rows, cols, 0.9, 1e-8)
    }

    pub fn with_params(rows: usize, cols: usize, decay: f32, epsilon: f32) -> Self {
        AdaDelta {
            decay,
            epsilon,
            eg: Array2::zeros((rows, cols)),
            ed: Array2::zeros((rows, cols)),
            delta: Array2::zeros((rows, cols)),
        }
    }
}

impl Optimizer for AdaDelta {
    fn calculate_update(
        &mut self,
        value: ArrayView2<f32>,
        gradient: ArrayView2<f32>,
        _learning_rate: f32,
    ) -> Result<Array2<f32>> {
        check_state_shapes("AdaDelta update", value, gradient, &self.eg)?;

        let decay = self.decay;

        // Decaying sum of squared gradients, up to time t.
        self.eg
            .zip_mut_with(&gradient, |e, &g| *e = decay * *e + (1.0 - decay) * g * g);
        ensure_finite(&self.eg, "AdaDelta squared-gradient average")?;

        // Decaying sum of squared updates, up to time t-1.
        let previous_delta = &self.delta;
        self.ed
            .zip_mut_with(previous_delta, |e, &d| *e = decay * *e + (1.0 - decay) * d * d);

        // delta = RMS(ED) / RMS(EG) * gradient
        let mut delta =
            (&self.ed + self.epsilon).mapv(f32::sqrt) / (&self.eg + self.epsilon).mapv(f32::sqrt);
        delta.zip_mut_with(&gradient, |d, &g| *d *= g);
        ensure_finite(&delta, "AdaDelta update")?;

        self.delta = delta.clone();
        Ok(delta)
    }
}
