/// A macro to assemble a [`Network`](crate::network::Network) from a name, a
/// loss function, and an ordered list of layers.
///
/// Each layer is pushed through `push_layer`, so consecutive size mismatches
/// surface as errors in the enclosing function.
///
/// # Examples
///
/// ```
/// use gradnet::create_network;
/// use gradnet::error::Result;
/// use gradnet::layers::{ActivationLayer, LinearLayer};
/// use gradnet::loss::SquaredError;
/// use gradnet::network::Network;
///
/// fn build() -> Result<Network> {
///     let network = create_network!("regressor", Box::new(SquaredError),
///         LinearLayer::new(4, 8, "fc1"),
///         ActivationLayer::relu(8, "relu1"),
///         LinearLayer::new(8, 1, "fc2"),
///     );
///     Ok(network)
/// }
/// # build().unwrap();
/// ```
#[macro_export]
macro_rules! create_network {
    ($name:expr, $loss:expr, $( $layer:expr ),* $(,)? ) => {{
        let mut network = $crate::network::Network::new($name, $loss);
        $( network.push_layer(Box::new($layer))?; )*
        network
    }};
}
