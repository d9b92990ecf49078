/// Error type returned by every fallible operation of the crate.
///
/// # Variants
///
/// - `ShapeMismatch` - A vector does not match the layer it is bound to
/// - `InvalidHyperparameter` - A hyperparameter is out of range
/// - `EmptyNetworkAccess` - The network has no layers
/// - `UnknownActivationTag` - An activation flag or name is not recognized
/// - `InvalidTopology` - The layer structure is not allowed
/// - `LayerOutOfRange` / `NeuronOutOfRange` - An introspection index does not exist
pub mod error;

pub use error::NetworkError;

/// A feedforward neural network with online backpropagation training.
///
/// # Core Components
///
/// ## Network Engine
/// - **Network**: Ordered layers of neurons; topology construction, forward propagation,
///   backpropagation, plain SGD weight updates, loss and output diagnostics
/// - **NeuronLayer** / **Neuron**: Value records indexed by position
///
/// ## Activation Functions
/// - **ActivationFunction**: Identity (`none`), ReLU, leaky ReLU, tanh sigmoid, log sigmoid,
///   modified tanh sigmoid and softmax, each paired with its derivative
/// - `softmax_in_place` - Max-subtracted, numerically stable softmax
///
/// ## Training Support
/// - **NetworkConfig**: Builds a network from (neuron count, activation) pairs and hyperparameters
/// - **WeightInit**: Normal weight initialization, optionally scaled by fan-in
/// - **Trainer** / **RecordSet**: Epoch loop over in-memory labeled records with accuracy reports
/// - **XorBenchmark**: Built-in self-test that learns XOR with a 2-4-1 tanh network
///
/// # Examples
/// ```rust
/// use rustynet::neural_network::*;
/// use ndarray::array;
///
/// let mut net = Network::with_seed(3);
/// net.add_layer(3, ActivationFunction::Identity).unwrap()
///     .add_layer(8, ActivationFunction::ReLU).unwrap()
///     .add_layer(2, ActivationFunction::Softmax).unwrap();
/// net.set_learning_rate(0.01).unwrap();
///
/// // Display the network
/// net.summary();
///
/// // One online training step
/// let loss = net.train(array![0.2, 0.4, 0.1].view(), array![1.0, 0.0].view()).unwrap();
/// assert!(loss >= 0.0);
///
/// // Inference
/// net.propagate(array![0.2, 0.4, 0.1].view()).unwrap();
/// let predicted = net.strongest_output_neuron_idx().unwrap();
/// assert!(predicted < 2);
/// ```
pub mod neural_network;

/// A convenience module that re-exports the most commonly used types of this crate.
///
/// # Examples
/// ```rust
/// use rustynet::prelude::*;
///
/// let net = NetworkConfig::new()
///     .with_layer(2, ActivationFunction::Identity)
///     .with_layer(1, ActivationFunction::LogSigmoid)
///     .build()
///     .unwrap();
/// assert_eq!(net.num_layers(), 2);
/// ```
pub mod prelude;
