use ndarray::{Array2, ArrayView2, Axis};

use crate::error::{ensure_finite, GradnetError, Result};
use crate::optimizer::{Optimizer, OptimizerConfig, ParamOptimizer};
use super::initialization::WeightInit;
use super::snapshot::LayerSnapshot;
use super::traits::{Layer, LayerType};

/// A fully connected layer.
///
/// Holds weights `(output_size, input_size)` and biases `(output_size, 1)`,
/// computing `y = W·x + b` over a batch of column vectors. Each parameter
/// owns its optimizer instance, sized to the parameter at construction and
/// fixed thereafter.
pub struct LinearLayer {
    name: String,
    weights: Array2<f32>,
    biases: Array2<f32>,
    batch_size: usize,
    optimizer_config: OptimizerConfig,
    weight_optimizer: ParamOptimizer,
    bias_optimizer: ParamOptimizer,
    input_cache: Option<Array2<f32>>,
    output_cache: Option<Array2<f32>>,
    weight_gradient: Option<Array2<f32>>,
    bias_gradient: Option<Array2<f32>>,
}

impl LinearLayer {
    /// Create a new fully connected layer with the given input and output
    /// sizes. The weights are initialized with random values from a uniform
    /// distribution between -0.1 and 0.1, the biases with zeros. The update
    /// rule defaults to a plain gradient step; select another with
    /// [`with_optimizer`](Self::with_optimizer) before training.
    pub fn new(input_size: usize, output_size: usize, name: impl Into<String>) -> Self {
        Self::new_with_init(
            input_size,
            output_size,
            name,
            WeightInit::Uniform { min: -0.1, max: 0.1 },
        )
    }

    /// Create a fully connected layer with a chosen weight initialization
    /// strategy.
    pub fn new_with_init(
        input_size: usize,
        output_size: usize,
        name: impl Into<String>,
        init: WeightInit,
    ) -> Self {
        let weights = init.initialize_weights((output_size, input_size));
        let biases = Array2::zeros((output_size, 1));
        let config = OptimizerConfig::default();
        let weight_optimizer = config.build(output_size, input_size);
        let bias_optimizer = config.build(output_size, 1);
        LinearLayer {
            name: name.into(),
            weights,
            biases,
            batch_size: 1,
            optimizer_config: config,
            weight_optimizer,
            bias_optimizer,
            input_cache: None,
            output_cache: None,
            weight_gradient: None,
            bias_gradient: None,
        }
    }

    /// Create a fully connected layer whose weights are drawn from a seeded
    /// generator, for reproducible experiments.
    pub fn new_seeded(
        input_size: usize,
        output_size: usize,
        name: impl Into<String>,
        init: WeightInit,
        seed: u64,
    ) -> Self {
        let weights = init.initialize_weights_seeded((output_size, input_size), seed);
        Self::new(input_size, output_size, name).with_weights(weights)
    }

    /// Replace the update rule, rebuilding the per-parameter optimizer state.
    pub fn with_optimizer(mut self, config: OptimizerConfig) -> Self {
        self.optimizer_config = config;
        self.weight_optimizer = config.build(self.output_size(), self.input_size());
        self.bias_optimizer = config.build(self.output_size(), 1);
        self
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Self {
        assert_eq!(weights.dim(), self.weights.dim());
        self.weights = weights;
        self
    }

    pub fn with_biases(mut self, biases: Array2<f32>) -> Self {
        assert_eq!(biases.dim(), self.biases.dim());
        self.biases = biases;
        self
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn biases(&self) -> &Array2<f32> {
        &self.biases
    }

    pub fn optimizer_config(&self) -> OptimizerConfig {
        self.optimizer_config
    }
}

impl Layer for LinearLayer {
    fn forward(&mut self, input: ArrayView2<f32>) -> Result<Array2<f32>> {
        let expected = (self.input_size(), self.batch_size);
        if input.dim() != expected {
            return Err(GradnetError::shape_mismatch(
                format!("forward input of layer '{}'", self.name),
                expected,
                input.dim(),
            ));
        }
        let output = self.weights.dot(&input) + &self.biases;
        ensure_finite(&output, &format!("output of layer '{}'", self.name))?;
        self.input_cache = Some(input.to_owned());
        self.output_cache = Some(output.clone());
        Ok(output)
    }

    fn backward(&mut self, output_gradient: ArrayView2<f32>) -> Result<Array2<f32>> {
        let input = self
            .input_cache
            .as_ref()
            .ok_or_else(|| GradnetError::unpaired_backward(&self.name))?;
        let expected = (self.output_size(), self.batch_size);
        if output_gradient.dim() != expected {
            return Err(GradnetError::shape_mismatch(
                format!("backward gradient of layer '{}'", self.name),
                expected,
                output_gradient.dim(),
            ));
        }
        let weight_gradient = output_gradient.dot(&input.t());
        let bias_gradient = output_gradient.sum_axis(Axis(1)).insert_axis(Axis(1));
        let input_gradient = self.weights.t().dot(&output_gradient);
        self.weight_gradient = Some(weight_gradient);
        self.bias_gradient = Some(bias_gradient);
        Ok(input_gradient)
    }

    fn update(&mut self, learning_rate: f32, decay: f32) -> Result<()> {
        let weight_gradient = self
            .weight_gradient
            .as_ref()
            .ok_or_else(|| GradnetError::unpaired_backward(&self.name))?;
        let bias_gradient = self
            .bias_gradient
            .as_ref()
            .ok_or_else(|| GradnetError::unpaired_backward(&self.name))?;

        let weight_update = self.weight_optimizer.calculate_update(
            self.weights.view(),
            weight_gradient.view(),
            learning_rate,
        )?;
        let bias_update = self.bias_optimizer.calculate_update(
            self.biases.view(),
            bias_gradient.view(),
            learning_rate,
        )?;

        // param -= update + decay * param
        self.weights
            .zip_mut_with(&weight_update, |w, &u| *w -= u + decay * *w);
        self.biases
            .zip_mut_with(&bias_update, |b, &u| *b -= u + decay * *b);
        Ok(())
    }

    fn resize_batch(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
        self.input_cache = None;
        self.output_cache = None;
        self.weight_gradient = None;
        self.bias_gradient = None;
    }

    fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Linear
    }

    fn cached_input(&self) -> Option<ArrayView2<f32>> {
        self.input_cache.as_ref().map(|m| m.view())
    }

    fn cached_output(&self) -> Option<ArrayView2<f32>> {
        self.output_cache.as_ref().map(|m| m.view())
    }

    fn weight_gradient(&self) -> Option<ArrayView2<f32>> {
        self.weight_gradient.as_ref().map(|m| m.view())
    }

    fn bias_gradient(&self) -> Option<ArrayView2<f32>> {
        self.bias_gradient.as_ref().map(|m| m.view())
    }

    fn to_snapshot(&self) -> LayerSnapshot {
        LayerSnapshot::Linear {
            name: self.name.clone(),
            input_size: self.input_size(),
            output_size: self.output_size(),
            batch_size: self.batch_size,
            weights: self.weights.clone(),
            biases: self.biases.clone(),
            optimizer: self.optimizer_config,
        }
    }
}
