use crate::error::{GradnetError, Result};
use crate::layers::{ActivationLayer, Layer, LinearLayer, SoftmaxLayer};
use crate::loss::Loss;
use crate::network::Network;
use crate::optimizer::OptimizerConfig;

/// Builder for constructing networks with a fluent API.
pub struct NetworkBuilder {
    name: String,
    layers: Vec<Box<dyn Layer>>,
    loss: Option<Box<dyn Loss>>,
}

impl NetworkBuilder {
    /// Create a new network builder
    pub fn new(name: impl Into<String>) -> Self {
        NetworkBuilder {
            name: name.into(),
            layers: Vec::new(),
            loss: None,
        }
    }

    /// Add an already constructed layer
    pub fn add_layer(mut self, layer: Box<dyn Layer>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add a fully connected layer with the default plain-gradient update
    pub fn add_linear(self, input_size: usize, output_size: usize, name: &str) -> Self {
        self.add_layer(Box::new(LinearLayer::new(input_size, output_size, name)))
    }

    /// Add a fully connected layer with a chosen update rule
    pub fn add_linear_with(
        self,
        input_size: usize,
        output_size: usize,
        name: &str,
        optimizer: OptimizerConfig,
    ) -> Self {
        self.add_layer(Box::new(
            LinearLayer::new(input_size, output_size, name).with_optimizer(optimizer),
        ))
    }

    pub fn add_relu(self, size: usize, name: &str) -> Self {
        self.add_layer(Box::new(ActivationLayer::relu(size, name)))
    }

    pub fn add_sigmoid(self, size: usize, name: &str) -> Self {
        self.add_layer(Box::new(ActivationLayer::sigmoid(size, name)))
    }

    pub fn add_elu(self, size: usize, alpha: f32, name: &str) -> Self {
        self.add_layer(Box::new(ActivationLayer::elu(size, alpha, name)))
    }

    pub fn add_identity(self, size: usize, name: &str) -> Self {
        self.add_layer(Box::new(ActivationLayer::identity(size, name)))
    }

    pub fn add_softmax(self, size: usize, name: &str) -> Self {
        self.add_layer(Box::new(SoftmaxLayer::new(size, name)))
    }

    /// Set the loss function
    pub fn with_loss(mut self, loss: Box<dyn Loss>) -> Self {
        self.loss = Some(loss);
        self
    }

    /// Build the network, validating that consecutive layers agree on sizes.
    pub fn build(self) -> Result<Network> {
        if self.layers.is_empty() {
            return Err(GradnetError::InvalidParameter {
                name: "layers".to_string(),
                reason: "Network must have at least one layer".to_string(),
            });
        }

        let loss = self.loss.ok_or_else(|| GradnetError::InvalidParameter {
            name: "loss".to_string(),
            reason: "Loss function not specified".to_string(),
        })?;

        let mut network = Network::new(self.name, loss);
        for layer in self.layers {
            network.push_layer(layer)?;
        }
        Ok(network)
    }
}
