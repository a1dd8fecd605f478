use ndarray::{Array2, ArrayView2};

use crate::activations::Activation;
use crate::error::{ensure_finite, GradnetError, Result};
use super::snapshot::LayerSnapshot;
use super::traits::{Layer, LayerType};

/// An element-wise activation stage in the layer stack.
///
/// Covers the ReLU, Sigmoid, ELU and Identity layer kinds; input and output
/// sizes coincide. The backward pass evaluates the local derivative from the
/// cached output.
pub struct ActivationLayer {
    name: String,
    size: usize,
    batch_size: usize,
    kind: Activation,
    input_cache: Option<Array2<f32>>,
    output_cache: Option<Array2<f32>>,
}

impl ActivationLayer {
    pub fn new(size: usize, kind: Activation, name: impl Into<String>) -> Self {
        ActivationLayer {
            name: name.into(),
            size,
            batch_size: 1,
            kind,
            input_cache: None,
            output_cache: None,
        }
    }

    pub fn relu(size: usize, name: impl Into<String>) -> Self {
        Self::new(size, Activation::Relu, name)
    }

    pub fn sigmoid(size: usize, name: impl Into<String>) -> Self {
        Self::new(size, Activation::Sigmoid, name)
    }

    pub fn elu(size: usize, alpha: f32, name: impl Into<String>) -> Self {
        Self::new(size, Activation::Elu { alpha }, name)
    }

    pub fn identity(size: usize, name: impl Into<String>) -> Self {
        Self::new(size, Activation::Identity, name)
    }

    pub fn kind(&self) -> Activation {
        self.kind
    }
}

impl Layer for ActivationLayer {
    fn forward(&mut self, input: ArrayView2<f32>) -> Result<Array2<f32>> {
        let expected = (self.size, self.batch_size);
        if input.dim() != expected {
            return Err(GradnetError::shape_mismatch(
                format!("forward input of layer '{}'", self.name),
                expected,
                input.dim(),
            ));
        }
        let mut output = input.to_owned();
        self.kind.apply_batch(&mut output);
        ensure_finite(&output, &format!("output of layer '{}'", self.name))?;
        self.input_cache = Some(input.to_owned());
        self.output_cache = Some(output.clone());
        Ok(output)
    }

    fn backward(&mut self, output_gradient: ArrayView2<f32>) -> Result<Array2<f32>> {
        let output = self
            .output_cache
            .as_ref()
            .ok_or_else(|| GradnetError::unpaired_backward(&self.name))?;
        let expected = (self.size, self.batch_size);
        if output_gradient.dim() != expected {
            return Err(GradnetError::shape_mismatch(
                format!("backward gradient of layer '{}'", self.name),
                expected,
                output_gradient.dim(),
            ));
        }
        let mut input_gradient = self.kind.derivative_from_output(output.view());
        input_gradient.zip_mut_with(&output_gradient, |d, &g| *d *= g);
        Ok(input_gradient)
    }

    fn update(&mut self, _learning_rate: f32, _decay: f32) -> Result<()> {
        Ok(())
    }

    fn resize_batch(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
        self.input_cache = None;
        self.output_cache = None;
    }

    fn input_size(&self) -> usize {
        self.size
    }

    fn output_size(&self) -> usize {
        self.size
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn layer_type(&self) -> LayerType {
        match self.kind {
            Activation::Identity => LayerType::Identity,
            Activation::Relu => LayerType::Relu,
            Activation::Sigmoid => LayerType::Sigmoid,
            Activation::Elu { .. } => LayerType::Elu,
        }
    }

    fn cached_input(&self) -> Option<ArrayView2<f32>> {
        self.input_cache.as_ref().map(|m| m.view())
    }

    fn cached_output(&self) -> Option<ArrayView2<f32>> {
        self.output_cache.as_ref().map(|m| m.view())
    }

    fn to_snapshot(&self) -> LayerSnapshot {
        LayerSnapshot::Activation {
            name: self.name.clone(),
            size: self.size,
            batch_size: self.batch_size,
            kind: self.kind,
        }
    }
}
