use ndarray::{Array2, ArrayView2, Axis};

use crate::error::{ensure_finite, GradnetError, Result};
use super::snapshot::LayerSnapshot;
use super::traits::{Layer, LayerType};

/// Column-wise softmax layer.
///
/// Normalizes each sample column into a probability distribution. Unlike the
/// element-wise activations it couples the entries of a column, so the
/// backward pass applies the full per-column Jacobian:
/// `dx_i = y_i * (dy_i - Σ_k dy_k * y_k)`.
pub struct SoftmaxLayer {
    name: String,
    size: usize,
    batch_size: usize,
    input_cache: Option<Array2<f32>>,
    output_cache: Option<Array2<f32>>,
}

impl SoftmaxLayer {
    pub fn new(size: usize, name: impl Into<String>) -> Self {
        SoftmaxLayer {
            name: name.into(),
            size,
            batch_size: 1,
            input_cache: None,
            output_cache: None,
        }
    }
}

impl Layer for SoftmaxLayer {
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
        for mut column in output.axis_iter_mut(Axis(1)) {
            // shift by the column max so exp cannot overflow
            let max = column.iter().fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            column.mapv_inplace(|v| (v - max).exp());
            let sum = column.sum();
            column.mapv_inplace(|v| v / sum);
        }
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
        let mut input_gradient = output_gradient.to_owned();
        for (mut grad_column, y_column) in input_gradient
            .axis_iter_mut(Axis(1))
            .zip(output.axis_iter(Axis(1)))
        {
            let weighted: f32 = grad_column
                .iter()
                .zip(y_column.iter())
                .map(|(&g, &y)| g * y)
                .sum();
            for (g, &y) in grad_column.iter_mut().zip(y_column.iter()) {
                *g = y * (*g - weighted);
            }
        }
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
        LayerType::Softmax
    }

    fn cached_input(&self) -> Option<ArrayView2<f32>> {
        self.input_cache.as_ref().map(|m| m.view())
    }

    fn cached_output(&self) -> Option<ArrayView2<f32>> {
        self.output_cache.as_ref().map(|m| m.view())
    }

    fn to_snapshot(&self) -> LayerSnapshot {
        LayerSnapshot::Softmax {
            name: self.name.clone(),
            size: self.size,
            batch_size: self.batch_size,
        }
    }
}
