pub mod activation;
pub mod initialization;
pub mod linear;
pub mod snapshot;
pub mod softmax;
pub mod traits;

pub use activation::ActivationLayer;
pub use initialization::WeightInit;
pub use linear::LinearLayer;
pub use snapshot::LayerSnapshot;
pub use softmax::SoftmaxLayer;
pub use traits::{Layer, LayerType};
