use ndarray::array;

use crate::error::GradnetError;
use crate::loss::{CrossEntropy, Loss, SquaredError};

#[test]
fn test_squared_error_loss() {
    let target = array![[1.0], [0.0], [1.0]];
    let prediction = array![[0.9], [0.1], [0.8]];

    let loss = SquaredError.calculate_loss(target.view(), prediction.view()).unwrap();
    // 0.5 * (0.01 + 0.01 + 0.04)
    assert!((loss - 0.03).abs() < 1e-6);
}

#[test]
fn test_squared_error_gradient() {
    let target = array![[1.0], [0.0]];
    let prediction = array![[0.75], [0.25]];

    let gradient = SquaredError
        .calculate_gradient(target.view(), prediction.view())
        .unwrap();
    assert_eq!(gradient, array![[-0.25], [0.25]]);
}

#[test]
fn test_squared_error_is_pure() {
    let target = array![[1.0, 0.0], [0.0, 1.0]];
    let prediction = array![[0.8, 0.3], [0.2, 0.7]];

    let first = SquaredError.calculate_loss(target.view(), prediction.view()).unwrap();
    let second = SquaredError.calculate_loss(target.view(), prediction.view()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cross_entropy_loss() {
    let target = array![[0.0], [1.0], [0.0]];
    let prediction = array![[0.25], [0.5], [0.25]];

    let loss = CrossEntropy.calculate_loss(target.view(), prediction.view()).unwrap();
    assert!((loss - 0.693147).abs() < 1e-5);
}

#[test]
fn test_cross_entropy_gradient_is_difference() {
    let target = array![[0.0], [1.0]];
    let prediction = array![[0.3], [0.7]];

    let gradient = CrossEntropy
        .calculate_gradient(target.view(), prediction.view())
        .unwrap();
    assert!((gradient[[0, 0]] - 0.3).abs() < 1e-6);
    assert!((gradient[[1, 0]] - (-0.3)).abs() < 1e-6);
}

#[test]
fn test_cross_entropy_survives_zero_prediction() {
    let target = array![[1.0], [0.0]];
    let prediction = array![[0.0], [1.0]];

    let loss = CrossEntropy.calculate_loss(target.view(), prediction.view()).unwrap();
    assert!(loss.is_finite());
}

#[test]
fn test_loss_shape_mismatch() {
    let target = array![[1.0], [0.0]];
    let prediction = array![[0.5], [0.25], [0.25]];

    assert!(matches!(
        SquaredError.calculate_loss(target.view(), prediction.view()),
        Err(GradnetError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        SquaredError.calculate_gradient(target.view(), prediction.view()),
        Err(GradnetError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        CrossEntropy.calculate_loss(target.view(), prediction.view()),
        Err(GradnetError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        CrossEntropy.calculate_gradient(target.view(), prediction.view()),
        Err(GradnetError::ShapeMismatch { .. })
    ));
}
