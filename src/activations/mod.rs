//! # Activation Functions Module
//!
//! Element-wise nonlinearities used by the activation layers. Each kind knows
//! how to apply itself in place to a batch of column vectors and how to
//! evaluate its local derivative from the cached layer *output*, which is the
//! form backpropagation needs here (every supported kind has a derivative
//! expressible in terms of its own output).
//!
//! Softmax is not part of this set: it couples the elements of a column and
//! lives in its own layer with a full per-column Jacobian.

pub mod functions;

pub use functions::Activation;
