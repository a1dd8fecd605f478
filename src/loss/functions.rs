use ndarray::{Array2, ArrayView2};

use crate::error::{GradnetError, Result};

/// Trait defining the interface for loss functions.
///
/// Both operations are pure and accept `(feature_size, batch_size)` matrices
/// of matching shapes.
pub trait Loss {
    /// Compute the scalar loss for a batch of predictions against targets
    fn calculate_loss(&self, target: ArrayView2<f32>, prediction: ArrayView2<f32>) -> Result<f32>;

    /// Compute the gradient of the loss with respect to the predictions
    fn calculate_gradient(
        &self,
        target: ArrayView2<f32>,
        prediction: ArrayView2<f32>,
    ) -> Result<Array2<f32>>;
}

fn check_shapes(target: ArrayView2<f32>, prediction: ArrayView2<f32>, context: &str) -> Result<()> {
    if target.dim() != prediction.dim() {
        return Err(GradnetError::shape_mismatch(context, target.dim(), prediction.dim()));
    }
    Ok(())
}

/// Squared-error loss: `0.5 * Σ (prediction - target)²`
pub struct SquaredError;

impl Loss for SquaredError {
    fn calculate_loss(&self, target: ArrayView2<f32>, prediction: ArrayView2<f32>) -> Result<f32> {
        check_shapes(target, prediction, "squared-error loss")?;
        let diff = &prediction - &target;
        Ok(0.5 * diff.mapv(|d| d * d).sum())
    }

    fn calculate_gradient(
        &self,
        target: ArrayView2<f32>,
        prediction: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        check_shapes(target, prediction, "squared-error gradient")?;
        Ok(&prediction - &target)
    }
}

/// Cross-entropy loss for classification, paired with a softmax output layer
/// by convention; under that pairing the gradient pushed into the stack is
/// simply `prediction - target`.
pub struct CrossEntropy;

impl CrossEntropy {
    const EPSILON: f32 = 1e-7;
}

impl Loss for CrossEntropy {
    fn calculate_loss(&self, target: ArrayView2<f32>, prediction: ArrayView2<f32>) -> Result<f32> {
        check_shapes(target, prediction, "cross-entropy loss")?;
        let loss = -target
            .iter()
            .zip(prediction.iter())
            .map(|(&t, &p)| t * (p + Self::EPSILON).ln())
            .sum::<f32>();
        Ok(loss)
    }

    fn calculate_gradient(
        &self,
        target: ArrayView2<f32>,
        prediction: ArrayView2<f32>,
    ) -> Result<Array2<f32>> {
        check_shapes(target, prediction, "cross-entropy gradient")?;
        Ok(&prediction - &target)
    }
}
