use ndarray::array;

use crate::error::GradnetError;
use crate::layers::{ActivationLayer, Layer, LayerType, LinearLayer, SoftmaxLayer, WeightInit};
use crate::optimizer::OptimizerConfig;

#[test]
fn test_linear_creation() {
    let layer = LinearLayer::new(3, 2, "fc");
    assert_eq!(layer.input_size(), 3);
    assert_eq!(layer.output_size(), 2);
    assert_eq!(layer.batch_size(), 1);
    assert_eq!(layer.layer_type(), LayerType::Linear);
    assert_eq!(layer.weights().dim(), (2, 3));
    assert_eq!(layer.biases().dim(), (2, 1));
    assert!(layer.cached_output().is_none());
}

#[test]
fn test_linear_forward() {
    let mut layer = LinearLayer::new(2, 2, "fc")
        .with_weights(array![[1.0, 2.0], [3.0, 4.0]])
        .with_biases(array![[0.5], [-0.5]]);

    let input = array![[1.0], [2.0]];
    let output = layer.forward(input.view()).unwrap();

    assert_eq!(output, array![[5.5], [10.5]]);
    assert_eq!(layer.cached_input().unwrap(), input.view());
    assert_eq!(layer.cached_output().unwrap(), output.view());
}

#[test]
fn test_linear_forward_shape_mismatch() {
    let mut layer = LinearLayer::new(2, 2, "fc");

    // wrong feature count
    let bad_features = array![[1.0], [2.0], [3.0]];
    let result = layer.forward(bad_features.view());
    assert!(matches!(result, Err(GradnetError::ShapeMismatch { .. })));
    assert!(layer.cached_input().is_none());

    // wrong batch size
    let bad_batch = array![[1.0, 2.0], [3.0, 4.0]];
    let result = layer.forward(bad_batch.view());
    assert!(matches!(result, Err(GradnetError::ShapeMismatch { .. })));
}

#[test]
fn test_linear_backward() {
    let mut layer = LinearLayer::new(2, 2, "fc")
        .with_weights(array![[1.0, 2.0], [3.0, 4.0]])
        .with_biases(array![[0.0], [0.0]]);

    let input = array![[1.0], [2.0]];
    layer.forward(input.view()).unwrap();

    let output_gradient = array![[1.0], [-1.0]];
    let input_gradient = layer.backward(output_gradient.view()).unwrap();

    // dW = dy . x^T, db = row sums of dy, dx = W^T . dy
    assert_eq!(layer.weight_gradient().unwrap(), array![[1.0, 2.0], [-1.0, -2.0]].view());
    assert_eq!(layer.bias_gradient().unwrap(), array![[1.0], [-1.0]].view());
    assert_eq!(input_gradient, array![[-2.0], [-2.0]]);
}

#[test]
fn test_linear_backward_requires_forward() {
    let mut layer = LinearLayer::new(2, 2, "fc");
    let gradient = array![[1.0], [1.0]];
    let result = layer.backward(gradient.view());
    assert!(matches!(result, Err(GradnetError::UnpairedBackward { .. })));
}

#[test]
fn test_linear_backward_shape_mismatch() {
    let mut layer = LinearLayer::new(2, 3, "fc");
    let input = array![[1.0], [2.0]];
    layer.forward(input.view()).unwrap();

    let bad_gradient = array![[1.0], [1.0]];
    let result = layer.backward(bad_gradient.view());
    assert!(matches!(result, Err(GradnetError::ShapeMismatch { .. })));
    assert!(layer.weight_gradient().is_none());
}

#[test]
fn test_linear_update() {
    let mut layer = LinearLayer::new(2, 2, "fc")
        .with_weights(array![[1.0, 2.0], [3.0, 4.0]])
        .with_biases(array![[0.0], [0.0]]);

    let input = array![[1.0], [2.0]];
    layer.forward(input.view()).unwrap();
    layer.backward(array![[1.0], [-1.0]].view()).unwrap();
    layer.update(0.1, 0.0).unwrap();

    let expected_weights = array![[0.9, 1.8], [3.1, 4.2]];
    for (w, e) in layer.weights().iter().zip(expected_weights.iter()) {
        assert!((w - e).abs() < 1e-6);
    }
    let expected_biases = array![[-0.1], [0.1]];
    for (b, e) in layer.biases().iter().zip(expected_biases.iter()) {
        assert!((b - e).abs() < 1e-6);
    }
}

#[test]
fn test_linear_update_with_weight_decay() {
    let mut layer = LinearLayer::new(2, 2, "fc")
        .with_weights(array![[1.0, 2.0], [3.0, 4.0]])
        .with_biases(array![[0.0], [0.0]]);

    layer.forward(array![[1.0], [2.0]].view()).unwrap();
    layer.backward(array![[1.0], [-1.0]].view()).unwrap();
    layer.update(0.1, 0.01).unwrap();

    // w -= lr*dw + decay*w
    assert!((layer.weights()[[0, 0]] - 0.89).abs() < 1e-6);
    assert!((layer.weights()[[1, 1]] - 4.16).abs() < 1e-6);
}

#[test]
fn test_linear_update_requires_backward() {
    let mut layer = LinearLayer::new(2, 2, "fc");
    layer.forward(array![[1.0], [2.0]].view()).unwrap();
    let result = layer.update(0.1, 0.0);
    assert!(matches!(result, Err(GradnetError::UnpairedBackward { .. })));
}

#[test]
fn test_linear_resize_batch() {
    let mut layer = LinearLayer::new(2, 2, "fc")
        .with_weights(array![[1.0, 2.0], [3.0, 4.0]])
        .with_biases(array![[0.5], [-0.5]]);
    let weights_before = layer.weights().clone();

    layer.forward(array![[1.0], [2.0]].view()).unwrap();
    layer.resize_batch(3);

    assert_eq!(layer.batch_size(), 3);
    assert!(layer.cached_input().is_none());
    assert!(layer.cached_output().is_none());
    assert_eq!(layer.weights(), &weights_before);

    // the resize resets the state machine: backward needs a fresh forward
    let result = layer.backward(array![[1.0, 1.0, 1.0], [1.0, 1.0, 1.0]].view());
    assert!(matches!(result, Err(GradnetError::UnpairedBackward { .. })));

    let input = array![[1.0, 0.0, 1.0], [2.0, 1.0, 0.0]];
    let output = layer.forward(input.view()).unwrap();
    assert_eq!(output.dim(), (2, 3));
}

#[test]
fn test_linear_optimizer_selection() {
    let layer = LinearLayer::new(2, 2, "fc").with_optimizer(OptimizerConfig::adam());
    assert_eq!(layer.optimizer_config(), OptimizerConfig::adam());
}

#[test]
fn test_relu_layer_round_trip() {
    let mut layer = ActivationLayer::relu(2, "relu");
    layer.resize_batch(2);

    let input = array![[1.0, -1.0], [-0.5, 2.0]];
    let output = layer.forward(input.view()).unwrap();
    assert_eq!(output, array![[1.0, 0.0], [0.0, 2.0]]);

    let gradient = array![[1.0, 1.0], [1.0, 1.0]];
    let input_gradient = layer.backward(gradient.view()).unwrap();
    assert_eq!(input_gradient, array![[1.0, 0.0], [0.0, 1.0]]);
}

#[test]
fn test_sigmoid_layer_forward() {
    let mut layer = ActivationLayer::sigmoid(1, "sig");
    let output = layer.forward(array![[0.0]].view()).unwrap();
    assert!((output[[0, 0]] - 0.5).abs() < 1e-6);
    assert_eq!(layer.layer_type(), LayerType::Sigmoid);
}

#[test]
fn test_elu_layer_negative_branch() {
    let mut layer = ActivationLayer::elu(1, 1.0, "elu");
    let output = layer.forward(array![[-1.0]].view()).unwrap();
    assert!((output[[0, 0]] - (-0.632121)).abs() < 1e-5);

    let input_gradient = layer.backward(array![[1.0]].view()).unwrap();
    assert!((input_gradient[[0, 0]] - 0.367879).abs() < 1e-5);
    assert_eq!(layer.layer_type(), LayerType::Elu);
}

#[test]
fn test_identity_layer_passthrough() {
    let mut layer = ActivationLayer::identity(2, "id");
    let input = array![[3.0], [-4.0]];
    let output = layer.forward(input.view()).unwrap();
    assert_eq!(output, input);

    let gradient = array![[0.5], [0.25]];
    let input_gradient = layer.backward(gradient.view()).unwrap();
    assert_eq!(input_gradient, gradient);
    assert_eq!(layer.layer_type(), LayerType::Identity);
}

#[test]
fn test_activation_backward_requires_forward() {
    let mut layer = ActivationLayer::sigmoid(2, "sig");
    let result = layer.backward(array![[1.0], [1.0]].view());
    assert!(matches!(result, Err(GradnetError::UnpairedBackward { .. })));
}

#[test]
fn test_softmax_columns_are_distributions() {
    let mut layer = SoftmaxLayer::new(3, "softmax");
    layer.resize_batch(2);

    let input = array![[1.0, 10.0], [2.0, 10.0], [3.0, 10.0]];
    let output = layer.forward(input.view()).unwrap();

    for column in output.columns() {
        let sum: f32 = column.sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(column.iter().all(|&p| p > 0.0 && p < 1.0));
    }
    // equal logits map to the uniform distribution
    for &p in output.column(1).iter() {
        assert!((p - 1.0 / 3.0).abs() < 1e-6);
    }
}

#[test]
fn test_softmax_handles_large_logits() {
    let mut layer = SoftmaxLayer::new(2, "softmax");
    let input = array![[1000.0], [1001.0]];
    let output = layer.forward(input.view()).unwrap();
    assert!(output.iter().all(|p| p.is_finite()));
    assert!((output.sum() - 1.0).abs() < 1e-6);
}

#[test]
fn test_softmax_backward_is_zero_sum() {
    // the softmax Jacobian maps any gradient to a zero-sum direction per column
    let mut layer = SoftmaxLayer::new(3, "softmax");
    layer.forward(array![[0.1], [0.7], [0.2]].view()).unwrap();

    let gradient = array![[1.0], [-2.0], [0.5]];
    let input_gradient = layer.backward(gradient.view()).unwrap();
    let column_sum: f32 = input_gradient.column(0).sum();
    assert!(column_sum.abs() < 1e-6);
}

#[test]
fn test_softmax_backward_requires_forward() {
    let mut layer = SoftmaxLayer::new(3, "softmax");
    let result = layer.backward(array![[1.0], [1.0], [1.0]].view());
    assert!(matches!(result, Err(GradnetError::UnpairedBackward { .. })));
}

#[test]
fn test_weight_initialization() {
    // Xavier uniform stays within its limit
    let layer = LinearLayer::new_with_init(10, 20, "fc", WeightInit::XavierUniform);
    let limit = (6.0 / 30.0_f32).sqrt();
    for &w in layer.weights().iter() {
        assert!(w >= -limit && w <= limit);
    }

    // He normal produces roughly the expected variance
    let layer = LinearLayer::new_with_init(10, 20, "fc", WeightInit::HeNormal);
    let var: f32 = layer.weights().iter().map(|&w| w * w).sum::<f32>() / (10.0 * 20.0);
    let expected_var = 2.0 / 10.0;
    assert!((var - expected_var).abs() < 0.5);

    let layer = LinearLayer::new_with_init(4, 4, "fc", WeightInit::Zeros);
    assert!(layer.weights().iter().all(|&w| w == 0.0));
}

#[test]
fn test_seeded_initialization_is_reproducible() {
    let a = LinearLayer::new_seeded(5, 3, "fc", WeightInit::XavierUniform, 42);
    let b = LinearLayer::new_seeded(5, 3, "fc", WeightInit::XavierUniform, 42);
    let c = LinearLayer::new_seeded(5, 3, "fc", WeightInit::XavierUniform, 43);
    assert_eq!(a.weights(), b.weights());
    assert_ne!(a.weights(), c.weights());
}

#[test]
fn test_non_finite_input_is_rejected() {
    let mut layer = LinearLayer::new(1, 1, "fc").with_weights(array![[1.0]]);
    let result = layer.forward(array![[f32::INFINITY]].view());
    assert!(matches!(result, Err(GradnetError::NonFinite { .. })));
}
