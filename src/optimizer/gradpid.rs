use ndarray::{Array2, ArrayView2};

use crate::error::{ensure_finite, GradnetError, Result};
use super::{check_state_shapes, Optimizer};

/// Gradient descent with proportional, integral and derivative terms.
///
/// The three rates are derived from the learning rate: `p_rate = lr⁴`,
/// `i_rate = lr`, `d_rate = lr³`. The integral term reads the decayed
/// gradient average carried over from the *previous* call; `Edx` and
/// `dx_prev` are refreshed only after the update has been assembled, so the
/// integral term always lags the proportional one by a step.
pub struct GradPid {
    decay: f32,
    /// Decaying average of raw gradients, E[g]
    edx: Array2<f32>,
    /// Gradient seen by the previous call
    dx_prev: Array2<f32>,
}

impl GradPid {
    /// State sized to a `(rows, cols)` parameter, decay 0.9.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_decay(rows, cols, 0.9)
    }

    pub fn with_decay(rows: usize, cols: usize, decay: f32) -> Self {
        GradPid {
            decay,
            edx: Array2::zeros((rows, cols)),
            dx_prev: Array2::zeros((rows, cols)),
        }
    }
}

impl Optimizer for GradPid {
    fn calculate_update(
        &mut self,
        value: ArrayView2<f32>,
        gradient: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<Array2<f32>> {
        check_state_shapes("GradPID update", value, gradient, &self.edx)?;

        let p_rate = learning_rate * learning_rate * learning_rate * learning_rate;
        let i_rate = learning_rate;
        let d_rate = learning_rate * learning_rate * learning_rate;

        let delta_p = gradient.mapv(|g| p_rate * g);
        // integral term reads the average carried from the previous call
        let delta_i = self.edx.mapv(|e| i_rate * e);
        let delta_d = (&gradient - &self.dx_prev).mapv(|d| d_rate * d);

        let delta = delta_p + delta_i + delta_d;
        ensure_finite(&delta, "GradPID update")?;

        self.dx_prev.assign(&gradient);
        let decay = self.decay;
        self.edx
            .zip_mut_with(&gradient, |e, &g| *e = decay * *e + (1.0 - decay) * g);
        ensure_finite(&self.edx, "GradPID gradient average")?;

        Ok(delta)
    }
}

/// PID gradient control with per-element adaptive rate matrices.
///
/// Experimental. The intended surprisal-driven per-element rate adaptation
/// has no settled formula yet; until one lands, the rate matrices are seeded
/// uniformly from the scalar learning rate on first use (which makes the
/// trajectory coincide with [`GradPid`]) and can be replaced wholesale via
/// [`set_rates`](Self::set_rates). Prefer [`GradPid`] for real training.
pub struct AdaGradPid {
    decay: f32,
    seeded: bool,
    /// Per-element proportional rates
    p_rate: Array2<f32>,
    /// Per-element integral rates
    i_rate: Array2<f32>,
    /// Per-element derivative rates
    d_rate: Array2<f32>,
    /// Decaying average of raw gradients, E[g]
    edx: Array2<f32>,
    /// Gradient seen by the previous call
    dx_prev: Array2<f32>,
}

impl AdaGradPid {
    /// State sized to a `(rows, cols)` parameter, decay 0.9.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_decay(rows, cols, 0.9)
    }

    pub fn with_decay(rows: usize, cols: usize, decay: f32) -> Self {
        AdaGradPid {
            decay,
            seeded: false,
            p_rate: Array2::zeros((rows, cols)),
            i_rate: Array2::zeros((rows, cols)),
            d_rate: Array2::zeros((rows, cols)),
            edx: Array2::zeros((rows, cols)),
            dx_prev: Array2::zeros((rows, cols)),
        }
    }

    /// Replace the per-element rate matrices. All three must match the
    /// parameter shape this optimizer was allocated for.
    pub fn set_rates(
        &mut self,
        p_rate: Array2<f32>,
        i_rate: Array2<f32>,
        d_rate: Array2<f32>,
    ) -> Result<()> {
        let expected = self.edx.dim();
        for (name, rate) in [("p_rate", &p_rate), ("i_rate", &i_rate), ("d_rate", &d_rate)] {
            if rate.dim() != expected {
                return Err(GradnetError::shape_mismatch(
                    format!("AdaGradPID {}", name),
                    expected,
                    rate.dim(),
                ));
            }
        }
        self.p_rate = p_rate;
        self.i_rate = i_rate;
        self.d_rate = d_rate;
        self.seeded = true;
        Ok(())
    }
}

impl Optimizer for AdaGradPid {
    fn calculate_update(
        &mut self,
        value: ArrayView2<f32>,
        gradient: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<Array2<f32>> {
        check_state_shapes("AdaGradPID update", value, gradient, &self.edx)?;

        if !self.seeded {
            let lr = learning_rate;
            self.p_rate.fill(lr * lr * lr * lr);
            self.i_rate.fill(lr);
            self.d_rate.fill(lr * lr * lr);
            self.seeded = true;
        }

        let mut delta_p = self.p_rate.clone();
        delta_p.zip_mut_with(&gradient, |p, &g| *p *= g);
        let mut delta_i = self.i_rate.clone();
        delta_i.zip_mut_with(&self.edx, |i, &e| *i *= e);
        let mut delta_d = &gradient - &self.dx_prev;
        delta_d.zip_mut_with(&self.d_rate, |d, &r| *d *= r);

        let delta = delta_p + delta_i + delta_d;
        ensure_finite(&delta, "AdaGradPID update")?;

        self.dx_prev.assign(&gradient);
        let decay = self.decay;
        self.edx
            .zip_mut_with(&gradient, |e, &g| *e = decay * *e + (1.0 - decay) * g);
        ensure_finite(&self.edx, "AdaGradPID gradient average")?;

        Ok(delta)
    }
}
