/// Error types that can occur while building, training or querying a network
///
/// # Variants
///
/// - `ShapeMismatch` - An input, target or record vector does not match the size of the layer it is bound to
/// - `InvalidHyperparameter` - A hyperparameter (such as the learning rate) is out of range; a default was substituted
/// - `EmptyNetworkAccess` - An operation needs at least one layer, but none has been added
/// - `UnknownActivationTag` - An activation flag or name has no matching activation function
/// - `InvalidTopology` - The requested layer structure is not allowed (zero-sized layer, layer added after propagation, training with fewer than two layers)
/// - `LayerOutOfRange` - A layer index does not exist in the network
/// - `NeuronOutOfRange` - A neuron index does not exist in the output layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    ShapeMismatch(String),
    InvalidHyperparameter(String),
    EmptyNetworkAccess,
    UnknownActivationTag(String),
    InvalidTopology(String),
    LayerOutOfRange { index: usize, num_layers: usize },
    NeuronOutOfRange { index: usize, num_neurons: usize },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::ShapeMismatch(msg) => write!(f, "Incompatible shape: {}", msg),
            NetworkError::InvalidHyperparameter(msg) => {
                write!(f, "Invalid hyperparameter: {}", msg)
            }
            NetworkError::EmptyNetworkAccess => {
                write!(
                    f,
                    "The network has no layers. Add at least one layer before using it."
                )
            }
            NetworkError::UnknownActivationTag(tag) => {
                write!(f, "No activation function exists for tag '{}'", tag)
            }
            NetworkError::InvalidTopology(msg) => write!(f, "Invalid topology: {}", msg),
            NetworkError::LayerOutOfRange { index, num_layers } => write!(
                f,
                "Layer index {} is out of range for a network of {} layers",
                index, num_layers
            ),
            NetworkError::NeuronOutOfRange { index, num_neurons } => write!(
                f,
                "Neuron index {} is out of range for an output layer of {} neurons",
                index, num_neurons
            ),
        }
    }
}

/// Implements the standard error trait for NetworkError
impl std::error::Error for NetworkError {}
