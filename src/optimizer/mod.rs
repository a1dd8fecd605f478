//! Stateful optimization functions converting a raw gradient into the update
//! applied to a parameter.
//!
//! Each parametric layer owns one optimizer instance per learnable
//! parameter, sized to that parameter's shape at construction. The selection
//! is made once through [`OptimizerConfig`] and is immutable afterwards; the
//! running state lives in the per-parameter [`ParamOptimizer`] value.

pub mod adadelta;
pub mod adam;
pub mod gradpid;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, GradnetError, Result};

pub use adadelta::AdaDelta;
pub use adam::Adam;
pub use gradpid::{AdaGradPid, GradPid};

pub trait Optimizer {
    /// Calculate the update to subtract from `value` given its raw
    /// `gradient`. Mutates the optimizer's internal history; every element of
    /// the returned matrix is guaranteed finite.
    fn calculate_update(
        &mut self,
        value: ArrayView2<f32>,
        gradient: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<Array2<f32>>;
}

/// Construction-time selection of an update rule, persisted with the layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum OptimizerConfig {
    GradientDescent,
    AdaDelta { decay: f32, epsilon: f32 },
    Adam { beta1: f32, beta2: f32, epsilon: f32 },
    GradPid { decay: f32 },
    AdaGradPid { decay: f32 },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig::GradientDescent
    }
}

impl OptimizerConfig {
    pub fn adadelta() -> Self {
        OptimizerConfig::AdaDelta { decay: 0.9, epsilon: 1e-8 }
    }

    pub fn adam() -> Self {
        OptimizerConfig::Adam { beta1: 0.9, beta2: 0.999, epsilon: 1e-8 }
    }

    pub fn grad_pid() -> Self {
        OptimizerConfig::GradPid { decay: 0.9 }
    }

    /// Allocate per-parameter state for a parameter of the given shape.
    pub fn build(&self, rows: usize, cols: usize) -> ParamOptimizer {
        match *self {
            OptimizerConfig::GradientDescent => {
                ParamOptimizer::GradientDescent(GradientDescent)
            }
            OptimizerConfig::AdaDelta { decay, epsilon } => {
                ParamOptimizer::AdaDelta(AdaDelta::with_params(rows, cols, decay, epsilon))
            }
            OptimizerConfig::Adam { beta1, beta2, epsilon } => {
                ParamOptimizer::Adam(Adam::with_params(rows, cols, beta1, beta2, epsilon))
            }
            OptimizerConfig::GradPid { decay } => {
                ParamOptimizer::GradPid(GradPid::with_decay(rows, cols, decay))
            }
            OptimizerConfig::AdaGradPid { decay } => {
                ParamOptimizer::AdaGradPid(AdaGradPid::with_decay(rows, cols, decay))
            }
        }
    }
}

/// Tagged per-parameter optimizer state, dispatching to the concrete rule.
pub enum ParamOptimizer {
    GradientDescent(GradientDescent),
    AdaDelta(AdaDelta),
    Adam(Adam),
    GradPid(GradPid),
    AdaGradPid(AdaGradPid),
}

impl Optimizer for ParamOptimizer {
    fn calculate_update(
        &mut self,
        value: ArrayView2<f32>,
        gradient: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<Array2<f32>> {
        match self {
            ParamOptimizer::GradientDescent(optimizer) => {
                optimizer.calculate_update(value, gradient, learning_rate)
            }
            ParamOptimizer::AdaDelta(optimizer) => {
                optimizer.calculate_update(value, gradient, learning_rate)
            }
            ParamOptimizer::Adam(optimizer) => {
                optimizer.calculate_update(value, gradient, learning_rate)
            }
            ParamOptimizer::GradPid(optimizer) => {
                optimizer.calculate_update(value, gradient, learning_rate)
            }
            ParamOptimizer::AdaGradPid(optimizer) => {
                optimizer.calculate_update(value, gradient, learning_rate)
            }
        }
    }
}

/// Plain gradient step: `update = learning_rate * gradient`. Stateless.
pub struct GradientDescent;

impl Optimizer for GradientDescent {
    fn calculate_update(
        &mut self,
        value: ArrayView2<f32>,
        gradient: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<Array2<f32>> {
        if value.dim() != gradient.dim() {
            return Err(GradnetError::shape_mismatch(
                "gradient descent update",
                value.dim(),
                gradient.dim(),
            ));
        }
        let update = gradient.mapv(|g| learning_rate * g);
        ensure_finite(&update, "gradient descent update")?;
        Ok(update)
    }
}

pub(crate) fn check_state_shapes(
    context: &str,
    value: ArrayView2<f32>,
    gradient: ArrayView2<f32>,
    state: &Array2<f32>,
) -> Result<()> {
    if value.dim() != gradient.dim() || value.dim() != state.dim() {
        return Err(GradnetError::shape_mismatch(
            context,
            state.dim(),
            (value.dim(), gradient.dim()),
        ));
    }
    Ok(())
}
