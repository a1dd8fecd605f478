use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// An enumeration of the element-wise activation kinds usable as stack layers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Activation {
    #[default]
    Identity,
    Relu,
    Sigmoid,
    Elu { alpha: f32 },
}

impl Activation {
    /// Apply the activation function to a batch of column vectors in-place.
    pub fn apply_batch(&self, values: &mut Array2<f32>) {
        match self {
            Activation::Identity => {}
            Activation::Relu => {
                values.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Sigmoid => {
                values.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp()));
            }
            Activation::Elu { alpha } => {
                let a = *alpha;
                values.mapv_inplace(|v| if v > 0.0 { v } else { a * (v.exp() - 1.0) });
            }
        }
    }

    /// Local derivative evaluated from the activation's own output.
    ///
    /// Every kind in this set admits an output-based form: sigmoid as
    /// `y*(1-y)`, ELU as `y+alpha` on the negative branch.
    pub fn derivative_from_output(&self, output: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Identity => Array2::ones(output.dim()),
            Activation::Relu => {
                output.mapv(|y| if y > 0.0 { 1.0 } else { 0.0 })
            }
            Activation::Sigmoid => {
                output.mapv(|y| y * (1.0 - y))
            }
            Activation::Elu { alpha } => {
                let a = *alpha;
                output.mapv(|y| if y > 0.0 { 1.0 } else { y + a })
            }
        }
    }
}
