use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{GradnetError, Result};
use crate::optimizer::OptimizerConfig;
use super::activation::ActivationLayer;
use super::linear::LinearLayer;
use super::softmax::SoftmaxLayer;
use super::traits::Layer;

/// Persistable record of a single layer: type tag, shapes, and learned
/// parameters. Optimizer *selection* is persisted; optimizer running state
/// is rebuilt fresh on restore.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LayerSnapshot {
    Linear {
        name: String,
        input_size: usize,
        output_size: usize,
        batch_size: usize,
        weights: Array2<f32>,
        biases: Array2<f32>,
        optimizer: OptimizerConfig,
    },
    Activation {
        name: String,
        size: usize,
        batch_size: usize,
        kind: Activation,
    },
    Softmax {
        name: String,
        size: usize,
        batch_size: usize,
    },
}

impl LayerSnapshot {
    /// Rebuild the concrete layer this record describes, validating that the
    /// stored parameters agree with the stored shapes.
    pub fn into_layer(self) -> Result<Box<dyn Layer>> {
        match self {
            LayerSnapshot::Linear {
                name,
                input_size,
                output_size,
                batch_size,
                weights,
                biases,
                optimizer,
            } => {
                if weights.dim() != (output_size, input_size) {
                    return Err(GradnetError::SerializationMismatch {
                        reason: format!(
                            "layer '{}' stores {:?} weights for a {}x{} transform",
                            name,
                            weights.dim(),
                            output_size,
                            input_size
                        ),
                    });
                }
                if biases.dim() != (output_size, 1) {
                    return Err(GradnetError::SerializationMismatch {
                        reason: format!(
                            "layer '{}' stores {:?} biases for output size {}",
                            name,
                            biases.dim(),
                            output_size
                        ),
                    });
                }
                let mut layer = LinearLayer::new(input_size, output_size, name)
                    .with_optimizer(optimizer)
                    .with_weights(weights)
                    .with_biases(biases);
                layer.resize_batch(batch_size);
                Ok(Box::new(layer))
            }
            LayerSnapshot::Activation { name, size, batch_size, kind } => {
                let mut layer = ActivationLayer::new(size, kind, name);
                layer.resize_batch(batch_size);
                Ok(Box::new(layer))
            }
            LayerSnapshot::Softmax { name, size, batch_size } => {
                let mut layer = SoftmaxLayer::new(size, name);
                layer.resize_batch(batch_size);
                Ok(Box::new(layer))
            }
        }
    }
}
