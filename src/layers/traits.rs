use std::fmt;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use super::snapshot::LayerSnapshot;

/// Type tag identifying a concrete layer kind, persisted with the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerType {
    Linear,
    Relu,
    Sigmoid,
    Softmax,
    Elu,
    Identity,
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerType::Linear => "Linear",
            LayerType::Relu => "ReLU",
            LayerType::Sigmoid => "Sigmoid",
            LayerType::Softmax => "Softmax",
            LayerType::Elu => "ELU",
            LayerType::Identity => "Identity",
        };
        write!(f, "{}", name)
    }
}

/// Trait defining the interface for neural network layers.
///
/// Activation matrices are column-per-sample: a layer maps an
/// `(input_size, batch_size)` matrix to an `(output_size, batch_size)` one.
/// A layer moves through three states: freshly constructed (or resized) with
/// no caches, forwarded (input/output caches valid), and backwarded
/// (gradients valid). `backward` and `update` check the state they require
/// and fail with `UnpairedBackward` otherwise.
pub trait Layer {
    /// Forward transform. Caches the input and the produced output.
    fn forward(&mut self, input: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Backward transform: maps the loss gradient w.r.t. this layer's output
    /// to the gradient w.r.t. its input, storing parameter gradients as a
    /// side effect on parametric layers.
    fn backward(&mut self, output_gradient: ArrayView2<f32>) -> Result<Array2<f32>>;

    /// Apply the layer's optimizers to its learnable parameters, subtracting
    /// the computed update plus `decay * parameter`. No-op for layers
    /// without parameters.
    fn update(&mut self, learning_rate: f32, decay: f32) -> Result<()>;

    /// Reallocate batch-dependent state for a new batch size, dropping all
    /// cached activations and gradients. Parameters and optimizer state are
    /// untouched.
    fn resize_batch(&mut self, batch_size: usize);

    /// Get the input size of the layer
    fn input_size(&self) -> usize;

    /// Get the output size of the layer
    fn output_size(&self) -> usize;

    /// Get the current batch size of the layer
    fn batch_size(&self) -> usize;

    /// Get the layer's name
    fn name(&self) -> &str;

    /// Get the layer's type tag
    fn layer_type(&self) -> LayerType;

    /// Input cached by the most recent forward pass
    fn cached_input(&self) -> Option<ArrayView2<f32>>;

    /// Output cached by the most recent forward pass
    fn cached_output(&self) -> Option<ArrayView2<f32>>;

    /// Weight gradient stored by the most recent backward pass
    fn weight_gradient(&self) -> Option<ArrayView2<f32>> {
        None
    }

    /// Bias gradient stored by the most recent backward pass
    fn bias_gradient(&self) -> Option<ArrayView2<f32>> {
        None
    }

    /// Convert the layer into its persistable record.
    fn to_snapshot(&self) -> LayerSnapshot;
}
