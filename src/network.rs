use std::fs;
use std::io::{Read, Write};

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{GradnetError, Result};
use crate::layers::{Layer, LayerSnapshot};
use crate::loss::Loss;

/// A feed-forward neural network: an ordered stack of layers and a loss
/// function, trained by backpropagation.
///
/// The network owns its layers exclusively and propagates the batch size to
/// every layer. Activation matrices are column-per-sample throughout:
/// `forward` takes `(input_size, batch_size)` and produces
/// `(output_size, batch_size)`.
pub struct Network {
    name: String,
    pub layers: Vec<Box<dyn Layer>>,
    loss: Box<dyn Loss>,
    batch_size: usize,
}

/// Persistable record of a whole network: name, batch size, and the ordered
/// layer records.
#[derive(Serialize, Deserialize)]
struct NetworkSnapshot {
    name: String,
    batch_size: usize,
    layers: Vec<LayerSnapshot>,
}

impl Network {
    /// Create an empty network with the given name and loss function,
    /// batch size 1.
    pub fn new(name: impl Into<String>, loss: Box<dyn Loss>) -> Self {
        Network {
            name: name.into(),
            layers: Vec::new(),
            loss,
            batch_size: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Append a layer to the stack. The new layer's input size must match
    /// the current last layer's output size; the layer is brought to the
    /// network's batch size.
    pub fn push_layer(&mut self, mut layer: Box<dyn Layer>) -> Result<()> {
        if let Some(last) = self.layers.last() {
            if last.output_size() != layer.input_size() {
                return Err(GradnetError::shape_mismatch(
                    format!("pushing layer '{}' onto '{}'", layer.name(), last.name()),
                    last.output_size(),
                    layer.input_size(),
                ));
            }
        }
        layer.resize_batch(self.batch_size);
        tracing::debug!(network = %self.name, layer = %layer.name(), kind = %layer.layer_type(), "layer pushed");
        self.layers.push(layer);
        Ok(())
    }

    /// Forward pass: fold the input through the stack left to right.
    pub fn forward(&mut self, input: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut current = input.to_owned();
        for layer in &mut self.layers {
            current = layer.forward(current.view())?;
        }
        Ok(current)
    }

    /// Backward pass: fold the loss gradient through the stack right to
    /// left, returning the gradient w.r.t. the network input.
    pub fn backward(&mut self, loss_gradient: ArrayView2<f32>) -> Result<Array2<f32>> {
        let mut current = loss_gradient.to_owned();
        for layer in self.layers.iter_mut().rev() {
            current = layer.backward(current.view())?;
        }
        Ok(current)
    }

    /// Apply every layer's optimizer-driven parameter update.
    pub fn update(&mut self, learning_rate: f32, decay: f32) -> Result<()> {
        for layer in &mut self.layers {
            layer.update(learning_rate, decay)?;
        }
        Ok(())
    }

    /// One training step: forward, loss, backward, update. Returns the loss
    /// computed before the backward pass.
    pub fn train(
        &mut self,
        input: ArrayView2<f32>,
        target: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        let predictions = self.forward(input)?;
        let loss = self.loss.calculate_loss(target, predictions.view())?;
        let gradient = self.loss.calculate_gradient(target, predictions.view())?;
        self.backward(gradient.view())?;
        self.update(learning_rate, 0.0)?;
        tracing::debug!(network = %self.name, loss, "training step");
        Ok(loss)
    }

    /// Read-only evaluation: forward pass plus loss, no backward, no update.
    pub fn test(&mut self, input: ArrayView2<f32>, target: ArrayView2<f32>) -> Result<f32> {
        let predictions = self.forward(input)?;
        self.loss.calculate_loss(target, predictions.view())
    }

    /// Propagate a new batch size to every layer, dropping their cached
    /// activations and gradients.
    pub fn resize_batch(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
        for layer in &mut self.layers {
            layer.resize_batch(batch_size);
        }
    }

    /// Output of the last layer from the most recent forward pass.
    pub fn predictions(&self) -> Option<ArrayView2<f32>> {
        self.layers.last().and_then(|layer| layer.cached_output())
    }

    fn to_snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            name: self.name.clone(),
            batch_size: self.batch_size,
            layers: self.layers.iter().map(|layer| layer.to_snapshot()).collect(),
        }
    }

    fn from_snapshot(snapshot: NetworkSnapshot, loss: Box<dyn Loss>) -> Result<Self> {
        let mut layers: Vec<Box<dyn Layer>> = Vec::with_capacity(snapshot.layers.len());
        for record in snapshot.layers {
            layers.push(record.into_layer()?);
        }
        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(GradnetError::SerializationMismatch {
                    reason: format!(
                        "layer '{}' produces {} features but '{}' expects {}",
                        pair[0].name(),
                        pair[0].output_size(),
                        pair[1].name(),
                        pair[1].input_size()
                    ),
                });
            }
        }
        Ok(Network {
            name: snapshot.name,
            layers,
            loss,
            batch_size: snapshot.batch_size,
        })
    }

    /// Save the network's layer stack to a file in the binary format.
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = bincode::serialize(&self.to_snapshot())?;
        let mut file = fs::File::create(path)?;
        file.write_all(&serialized)?;
        tracing::info!(network = %self.name, path, "network saved");
        Ok(())
    }

    /// Load a network from a file written by [`save`](Self::save). The loss
    /// function is not persisted and must be supplied by the caller. The
    /// load is all-or-nothing: an undecodable or inconsistent stack fails
    /// without producing a partial network.
    pub fn load(path: &str, loss: Box<dyn Loss>) -> Result<Self> {
        let mut file = fs::File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        let snapshot: NetworkSnapshot = bincode::deserialize(&buffer)?;
        let network = Self::from_snapshot(snapshot, loss)?;
        tracing::info!(network = %network.name, path, "network loaded");
        Ok(network)
    }

    /// Save the network's layer stack to a file as JSON.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.to_snapshot())?;
        fs::write(path, serialized)?;
        tracing::info!(network = %self.name, path, "network saved");
        Ok(())
    }

    /// Load a network from a JSON file written by
    /// [`save_json`](Self::save_json).
    pub fn load_json(path: &str, loss: Box<dyn Loss>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let snapshot: NetworkSnapshot = serde_json::from_str(&contents)?;
        let network = Self::from_snapshot(snapshot, loss)?;
        tracing::info!(network = %network.name, path, "network loaded");
        Ok(network)
    }
}
