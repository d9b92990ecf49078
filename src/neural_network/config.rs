use crate::error::NetworkError;
use crate::neural_network::{
    ActivationFunction, DEFAULT_LEARNING_RATE, DEFAULT_TRAINING_EPOCHS, Network, WeightInit,
};

/// Everything needed to build a [`Network`]: the layer list and the hyperparameters.
///
/// This is the hand-off point for configuration sources such as command-line parsers. Layers
/// are given as (neuron count, activation) pairs, input layer first.
///
/// # Fields
///
/// - `layers` - Layer sizes and activations in propagation order
/// - `learning_rate` - Gradient descent step size; invalid values fall back to [`DEFAULT_LEARNING_RATE`]
/// - `num_training_epochs` - Epoch count for the training driver
/// - `seed` - Generator seed, `None` to seed from the operating system
/// - `weight_init` - Distribution the weights are drawn from
///
/// # Example
/// ```rust
/// use rustynet::neural_network::{ActivationFunction, NetworkConfig};
///
/// let net = NetworkConfig::new()
///     .with_layer(784, ActivationFunction::Identity)
///     .with_flag_layer('R', 32).unwrap()
///     .with_layer(10, ActivationFunction::Softmax)
///     .with_learning_rate(0.01)
///     .with_num_training_epochs(5)
///     .with_seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(net.topology(), "N784-R32-S10");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub layers: Vec<(usize, ActivationFunction)>,
    pub learning_rate: f32,
    pub num_training_epochs: usize,
    pub seed: Option<u64>,
    pub weight_init: WeightInit,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkConfig {
    /// Creates a configuration with no layers and default hyperparameters
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            learning_rate: DEFAULT_LEARNING_RATE,
            num_training_epochs: DEFAULT_TRAINING_EPOCHS,
            seed: None,
            weight_init: WeightInit::default(),
        }
    }

    /// Appends a layer
    pub fn with_layer(mut self, num_neurons: usize, activation: ActivationFunction) -> Self {
        self.layers.push((num_neurons, activation));
        self
    }

    /// Appends a layer given by its single-letter activation flag (`N`, `R`, `L`, `T`, `G`, `M`, `S`).
    ///
    /// # Returns
    ///
    /// - `Ok(NetworkConfig)` - The configuration with the layer appended
    /// - `Err(NetworkError::UnknownActivationTag)` - If the flag names no activation
    pub fn with_flag_layer(self, flag: char, num_neurons: usize) -> Result<Self, NetworkError> {
        let activation = ActivationFunction::from_flag(flag)?;
        Ok(self.with_layer(num_neurons, activation))
    }

    /// Sets the learning rate; validated when the network is built
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the number of training epochs
    pub fn with_num_training_epochs(mut self, num_training_epochs: usize) -> Self {
        self.num_training_epochs = num_training_epochs;
        self
    }

    /// Sets the generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the weight distribution
    pub fn with_weight_init(mut self, weight_init: WeightInit) -> Self {
        self.weight_init = weight_init;
        self
    }

    /// Builds the network, adding the layers in order.
    ///
    /// An invalid learning rate does not fail the build: the default is used and a warning
    /// is logged.
    ///
    /// # Returns
    ///
    /// - `Ok(Network)` - The constructed network
    /// - `Err(NetworkError::InvalidTopology)` - If a layer has no neurons
    /// - `Err(NetworkError::InvalidHyperparameter)` - If the weight distribution is invalid
    pub fn build(&self) -> Result<Network, NetworkError> {
        let mut net = Network::with_options(self.seed, self.weight_init)?;

        for &(num_neurons, activation) in &self.layers {
            net.add_layer(num_neurons, activation)?;
        }

        // Falls back to the default; the warning is logged by the network
        let _ = net.set_learning_rate(self.learning_rate);
        net.set_num_training_epochs(self.num_training_epochs);

        Ok(net)
    }
}
