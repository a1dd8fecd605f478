//! # Gradnet - Feed-Forward Neural Network Training
//!
//! Gradnet is a small Rust library for building and training feed-forward
//! neural networks by backpropagation. A network is an ordered stack of
//! layers; the weight update rule is delegated to a pluggable, stateful
//! optimization function chosen per layer at construction time.
//!
//! ## Key Features
//!
//! - **Layer stack**: Linear, ReLU, Sigmoid, Softmax, ELU and Identity
//!   layers composed behind one trait
//! - **Optimization functions**: plain gradient step, AdaDelta, Adam, and
//!   PID-style gradient control, each carrying per-parameter state
//! - **Strict shape discipline**: every forward/backward/update call
//!   validates matrix dimensions and fails fast instead of broadcasting
//! - **Persistence**: whole-stack save/load with binary and JSON forms
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gradnet::builders::NetworkBuilder;
//! use gradnet::loss::SquaredError;
//! use gradnet::optimizer::OptimizerConfig;
//! use ndarray::array;
//!
//! # fn main() -> gradnet::error::Result<()> {
//! let mut network = NetworkBuilder::new("xor")
//!     .add_linear_with(2, 8, "fc1", OptimizerConfig::adam())
//!     .add_sigmoid(8, "sig1")
//!     .add_linear_with(8, 1, "fc2", OptimizerConfig::adam())
//!     .add_sigmoid(1, "sig2")
//!     .with_loss(Box::new(SquaredError))
//!     .build()?;
//!
//! // columns are samples
//! network.resize_batch(4);
//! let inputs = array![[0.0, 0.0, 1.0, 1.0], [0.0, 1.0, 0.0, 1.0]];
//! let targets = array![[0.0, 1.0, 1.0, 0.0]];
//! for _ in 0..1000 {
//!     network.train(inputs.view(), targets.view(), 0.5)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Element-wise activation kinds used by the activation layers
//! - [`builders`] - Builder pattern for convenient network construction
//! - [`error`] - Error types and result handling
//! - [`layers`] - Layer trait and the concrete layer kinds
//! - [`loss`] - Loss functions for training
//! - [`network`] - The layer-stack network and its persistence
//! - [`optimizer`] - Stateful optimization functions

#[macro_use]
pub mod macros;

pub mod activations;
pub mod builders;
pub mod error;
pub mod layers;
pub mod loss;
pub mod network;
pub mod optimizer;

#[cfg(test)]
mod tests;
