use crate::error::NetworkError;
use crate::neural_network::{
    ActivationFunction, MeanSquaredError, NeuronLayer, WeightInit, softmax_in_place,
};
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Learning rate substituted when a non-positive or non-finite one is supplied
pub const DEFAULT_LEARNING_RATE: f32 = 0.001;

/// Number of training epochs a new network reports until the caller sets its own
pub const DEFAULT_TRAINING_EPOCHS: usize = 1;

/// An output neuron "fires" when its output is strictly above this value
pub const FIRING_THRESHOLD: f32 = 0.5;

/// Validates that the learning rate is positive and finite.
///
/// # Parameters
///
/// * `learning_rate` - The learning rate value to validate
///
/// # Returns
///
/// - `Ok(())` if the learning rate is positive and finite
/// - `Err(NetworkError::InvalidHyperparameter)` if the learning rate is not positive or not finite
pub(crate) fn validate_learning_rate(learning_rate: f32) -> Result<(), NetworkError> {
    if !(learning_rate > 0.0 && learning_rate.is_finite()) {
        return Err(NetworkError::InvalidHyperparameter(format!(
            "learning_rate must be positive and finite, got {}",
            learning_rate
        )));
    }
    Ok(())
}

/// A feedforward neural network trained online with backpropagation.
///
/// The network is an ordered list of [`NeuronLayer`]s. The first layer added is the input
/// layer, whose outputs are written directly by [`Network::set_inputs`]; the last layer added
/// is the output layer. Layers can only be added until the first propagation, after which the
/// structure is frozen and only outputs, deltas and weights change.
///
/// Each network owns its random generator. Weight initialization and the sampling helpers
/// ([`Network::random_number`], [`Network::random_index`]) draw from it, so two networks built
/// with the same seed and topology are identical.
///
/// # Fields
///
/// - `layers` - Layers in propagation order
/// - `learning_rate` - Step size of the gradient descent update, always positive
/// - `num_training_epochs` - Epoch count for training drivers; not used by the network itself
/// - `expected_output` - Target bound for the current training step (empty until bound)
/// - `weight_init` - Distribution new neurons draw their weights from
/// - `rng` - The network's own generator
/// - `topology_frozen` - Set by the first propagation; no layers can be added afterwards
///
/// # Example
/// ```rust
/// use rustynet::neural_network::{ActivationFunction, Network};
/// use ndarray::array;
///
/// let mut net = Network::with_seed(7);
/// net.add_layer(2, ActivationFunction::Identity).unwrap()
///     .add_layer(4, ActivationFunction::TanhSigmoid).unwrap()
///     .add_layer(1, ActivationFunction::TanhSigmoid).unwrap();
/// net.set_learning_rate(0.05).unwrap();
///
/// for _ in 0..2000 {
///     net.train(array![1.0, 0.0].view(), array![1.0].view()).unwrap();
///     net.train(array![0.0, 0.0].view(), array![0.0].view()).unwrap();
/// }
///
/// net.propagate(array![1.0, 0.0].view()).unwrap();
/// assert!(net.output_neuron_fires(0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) layers: Vec<NeuronLayer>,
    learning_rate: f32,
    num_training_epochs: usize,
    expected_output: Array1<f32>,
    weight_init: WeightInit,
    rng: StdRng,
    topology_frozen: bool,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// Creates an empty network with a generator seeded from the operating system
    pub fn new() -> Self {
        Self::from_rng(Self::seeded_rng(None), WeightInit::default())
    }

    /// Creates an empty network whose generator is seeded with `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Self::seeded_rng(Some(seed)), WeightInit::default())
    }

    /// Creates an empty network with an optional seed and a custom weight distribution.
    ///
    /// # Parameters
    ///
    /// - `seed` - Seed for the generator, or `None` to seed from the operating system
    /// - `weight_init` - Distribution every neuron's weights and bias are drawn from
    ///
    /// # Returns
    ///
    /// - `Ok(Network)` - An empty network
    /// - `Err(NetworkError::InvalidHyperparameter)` - If the weight distribution is invalid
    pub fn with_options(seed: Option<u64>, weight_init: WeightInit) -> Result<Self, NetworkError> {
        weight_init.validate()?;
        Ok(Self::from_rng(Self::seeded_rng(seed), weight_init))
    }

    fn seeded_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        }
    }

    fn from_rng(rng: StdRng, weight_init: WeightInit) -> Self {
        Self {
            layers: Vec::new(),
            learning_rate: DEFAULT_LEARNING_RATE,
            num_training_epochs: DEFAULT_TRAINING_EPOCHS,
            expected_output: Array1::zeros(0),
            weight_init,
            rng,
            topology_frozen: false,
        }
    }

    /// Appends a layer of `num_neurons` neurons after the current last layer.
    ///
    /// Each new neuron receives one input weight per neuron of the current last layer (none if
    /// this is the first layer). Supports method chaining.
    ///
    /// Only a softmax output layer is normalized; a softmax hidden layer passes its raw sums
    /// on unchanged. Its derivative is taken to be 1 during backpropagation either way.
    ///
    /// # Parameters
    ///
    /// - `num_neurons` - Size of the new layer
    /// - `activation` - Activation function shared by the layer's neurons
    ///
    /// # Returns
    ///
    /// - `Ok(&mut Network)` - Mutable reference to self for method chaining
    /// - `Err(NetworkError::InvalidTopology)` - If `num_neurons` is 0, or the network has already propagated
    pub fn add_layer(
        &mut self,
        num_neurons: usize,
        activation: ActivationFunction,
    ) -> Result<&mut Self, NetworkError> {
        if self.topology_frozen {
            log::warn!("Refusing to add a layer to a network that has already propagated");
            return Err(NetworkError::InvalidTopology(String::from(
                "layers cannot be added after the network has propagated",
            )));
        }

        if num_neurons == 0 {
            return Err(NetworkError::InvalidTopology(String::from(
                "a layer needs at least one neuron",
            )));
        }

        let fan_in = self.layers.last().map_or(0, NeuronLayer::len);
        let layer = NeuronLayer::new(
            num_neurons,
            fan_in,
            activation,
            &self.weight_init,
            &mut self.rng,
        )?;

        log::debug!(
            "Added layer {} with {} {} neurons ({} weights each)",
            self.layers.len(),
            num_neurons,
            activation,
            fan_in
        );
        self.layers.push(layer);

        Ok(self)
    }

    fn output_layer(&self) -> Result<&NeuronLayer, NetworkError> {
        self.layers.last().ok_or_else(|| {
            log::warn!("Attempted to query an empty network");
            NetworkError::EmptyNetworkAccess
        })
    }

    fn check_input_len(&self, len: usize) -> Result<(), NetworkError> {
        let input_layer = self.layers.first().ok_or(NetworkError::EmptyNetworkAccess)?;
        if len != input_layer.len() {
            log::warn!("Incompatible input layer for the given inputs");
            return Err(NetworkError::ShapeMismatch(format!(
                "input layer has {} neurons, got {} inputs",
                input_layer.len(),
                len
            )));
        }
        Ok(())
    }

    fn check_expected_output_len(&self, len: usize) -> Result<(), NetworkError> {
        let output_layer = self.output_layer()?;
        if len != output_layer.len() {
            log::warn!("Number of expected output elements does not match the output layer");
            return Err(NetworkError::ShapeMismatch(format!(
                "output layer has {} neurons, got {} expected outputs",
                output_layer.len(),
                len
            )));
        }
        Ok(())
    }

    /// Writes `inputs` into the outputs of the input layer, position by position.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If the inputs were bound
    /// - `Err(NetworkError::EmptyNetworkAccess)` - If the network has no layers
    /// - `Err(NetworkError::ShapeMismatch)` - If `inputs` does not match the input layer's size; nothing is written
    pub fn set_inputs(&mut self, inputs: ArrayView1<f32>) -> Result<(), NetworkError> {
        self.check_input_len(inputs.len())?;

        let input_layer = &mut self.layers[0];
        for (neuron, &value) in input_layer.neurons.iter_mut().zip(inputs.iter()) {
            neuron.output = value;
        }

        Ok(())
    }

    /// Stores the target the next backward pass and loss are measured against.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If the target was stored
    /// - `Err(NetworkError::EmptyNetworkAccess)` - If the network has no layers
    /// - `Err(NetworkError::ShapeMismatch)` - If `expected` does not match the output layer's size; the previous target is kept
    pub fn set_expected_output(&mut self, expected: ArrayView1<f32>) -> Result<(), NetworkError> {
        self.check_expected_output_len(expected.len())?;
        self.expected_output = expected.to_owned();
        Ok(())
    }

    /// Runs a forward pass on `input` without training.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - The output layer now holds the network's prediction
    /// - `Err(NetworkError::EmptyNetworkAccess)` - If the network has no layers
    /// - `Err(NetworkError::ShapeMismatch)` - If `input` does not match the input layer's size
    pub fn propagate(&mut self, input: ArrayView1<f32>) -> Result<(), NetworkError> {
        self.set_inputs(input)?;
        self.propagate_forward();
        Ok(())
    }

    pub(crate) fn propagate_forward(&mut self) {
        self.topology_frozen = true;

        let output_idx = self.layers.len().saturating_sub(1);

        // q indexes both a neuron's weights and the preceding layer's neurons
        for i in 1..self.layers.len() {
            let inputs = self.layers[i - 1].outputs();
            let layer = &mut self.layers[i];
            let activation = layer.activation();

            for neuron in layer.neurons.iter_mut() {
                neuron.output = activation.apply(neuron.weighted_sum(&inputs));
            }

            if i == output_idx && activation.is_layer_wide() {
                let mut outputs = layer.outputs();
                softmax_in_place(outputs.view_mut());
                for (neuron, &value) in layer.neurons.iter_mut().zip(outputs.iter()) {
                    neuron.output = value;
                }
            }
        }
    }

    pub(crate) fn propagate_back(&mut self) {
        let Some(output_layer) = self.layers.last_mut() else {
            return;
        };

        let activation = output_layer.activation();
        let outputs = output_layer.outputs();
        let errors = MeanSquaredError::output_error(self.expected_output.view(), outputs.view());
        for (neuron, &error) in output_layer.neurons.iter_mut().zip(errors.iter()) {
            neuron.delta = activation.derivative(neuron.output) * error;
        }

        // Hidden layers from last to first; the input layer never gets a delta
        for i in (1..self.layers.len().saturating_sub(1)).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            let this_layer = &mut head[i];
            let next_layer = &tail[0];
            let activation = this_layer.activation();

            for (o, neuron) in this_layer.neurons.iter_mut().enumerate() {
                let delta_sum: f32 = next_layer
                    .neurons
                    .iter()
                    .map(|next| next.delta * next.input_weights[o])
                    .sum();
                neuron.delta = activation.derivative(neuron.output) * delta_sum;
            }
        }
    }

    fn update_weights(&mut self) {
        let learning_rate = self.learning_rate;

        for i in 1..self.layers.len() {
            let (head, tail) = self.layers.split_at_mut(i);
            let inputs = head[i - 1].outputs();

            for neuron in tail[0].neurons.iter_mut() {
                let delta = neuron.delta;
                neuron
                    .input_weights
                    .zip_mut_with(&inputs, |w, &x| *w -= learning_rate * (x * delta));
                neuron.bias_weight -= learning_rate * delta;
            }
        }
    }

    /// Performs one online training step on a single example.
    ///
    /// Binds the input and target, then runs forward propagation, backpropagation and the
    /// weight update, in that order. Both vectors are validated before either is written.
    ///
    /// # Parameters
    ///
    /// - `input` - Example input, sized like the input layer
    /// - `expected_output` - Target, sized like the output layer
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - Mean squared error of the forward pass, measured before the weights were updated
    /// - `Err(NetworkError::EmptyNetworkAccess)` - If the network has no layers
    /// - `Err(NetworkError::InvalidTopology)` - If the network has only one layer
    /// - `Err(NetworkError::ShapeMismatch)` - If either vector has the wrong length; nothing is changed
    pub fn train(
        &mut self,
        input: ArrayView1<f32>,
        expected_output: ArrayView1<f32>,
    ) -> Result<f32, NetworkError> {
        match self.layers.len() {
            0 => return Err(NetworkError::EmptyNetworkAccess),
            1 => {
                return Err(NetworkError::InvalidTopology(String::from(
                    "training needs at least an input and an output layer",
                )));
            }
            _ => {}
        }

        self.check_input_len(input.len())?;
        self.check_expected_output_len(expected_output.len())?;

        self.set_inputs(input)?;
        self.set_expected_output(expected_output)?;

        self.propagate_forward();
        let loss = self.loss()?;
        self.propagate_back();
        self.update_weights();

        Ok(loss)
    }

    /// Mean squared error between the output layer and the bound target.
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - (1/N) * sum((output - expected)^2) over the output layer
    /// - `Err(NetworkError::EmptyNetworkAccess)` - If the network has no layers
    /// - `Err(NetworkError::ShapeMismatch)` - If no target matching the output layer has been bound
    pub fn loss(&self) -> Result<f32, NetworkError> {
        let output_layer = self.output_layer()?;
        if self.expected_output.len() != output_layer.len() {
            return Err(NetworkError::ShapeMismatch(format!(
                "output layer has {} neurons, but the bound target has {} elements",
                output_layer.len(),
                self.expected_output.len()
            )));
        }

        let outputs = output_layer.outputs();
        Ok(MeanSquaredError::compute_loss(
            self.expected_output.view(),
            outputs.view(),
        ))
    }

    /// Index of the output neuron with the highest output.
    ///
    /// Ties go to the lowest index.
    ///
    /// # Returns
    ///
    /// - `Ok(usize)` - Index into the output layer
    /// - `Err(NetworkError::EmptyNetworkAccess)` - If the network has no layers
    pub fn strongest_output_neuron_idx(&self) -> Result<usize, NetworkError> {
        let output_layer = self.output_layer()?;

        let mut strongest_idx = 0;
        let mut strongest_output = f32::NEG_INFINITY;
        for (i, neuron) in output_layer.neurons.iter().enumerate() {
            if neuron.output > strongest_output {
                strongest_output = neuron.output;
                strongest_idx = i;
            }
        }

        Ok(strongest_idx)
    }

    /// One-hot view of the output layer for accuracy scoring.
    ///
    /// # Returns
    ///
    /// - `Ok(Array1<f32>)` - 1.0 at the strongest output neuron if it fires, all zeros otherwise
    /// - `Err(NetworkError::EmptyNetworkAccess)` - If the network has no layers
    pub fn activation_vector(&self) -> Result<Array1<f32>, NetworkError> {
        let output_layer = self.output_layer()?;
        let strongest_idx = self.strongest_output_neuron_idx()?;

        let mut activations = Array1::zeros(output_layer.len());
        if output_layer.neurons[strongest_idx].output > FIRING_THRESHOLD {
            activations[strongest_idx] = 1.0;
        }

        Ok(activations)
    }

    /// Output of the `idx`th output neuron
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - The neuron's last output
    /// - `Err(NetworkError::EmptyNetworkAccess)` - If the network has no layers
    /// - `Err(NetworkError::NeuronOutOfRange)` - If `idx` is not in the output layer
    pub fn output_of_neuron(&self, idx: usize) -> Result<f32, NetworkError> {
        let output_layer = self.output_layer()?;
        output_layer
            .neurons
            .get(idx)
            .map(|neuron| neuron.output)
            .ok_or(NetworkError::NeuronOutOfRange {
                index: idx,
                num_neurons: output_layer.len(),
            })
    }

    /// Whether the `idx`th output neuron's output is above [`FIRING_THRESHOLD`]
    pub fn output_neuron_fires(&self, idx: usize) -> Result<bool, NetworkError> {
        Ok(self.output_of_neuron(idx)? > FIRING_THRESHOLD)
    }

    /// Outputs of the whole output layer
    pub fn output_vector(&self) -> Result<Array1<f32>, NetworkError> {
        Ok(self.output_layer()?.outputs())
    }

    /// Layer at position `idx`
    pub fn layer(&self, idx: usize) -> Result<&NeuronLayer, NetworkError> {
        self.layers.get(idx).ok_or(NetworkError::LayerOutOfRange {
            index: idx,
            num_layers: self.layers.len(),
        })
    }

    /// All layers, input layer first
    pub fn layers(&self) -> &[NeuronLayer] {
        &self.layers
    }

    /// Input weights of every neuron in a layer.
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f32>)` - Shape (neurons in the layer, neurons in the preceding layer); row `o` holds neuron `o`'s weights
    /// - `Err(NetworkError::LayerOutOfRange)` - If `layer` does not exist
    pub fn weights_in_layer(&self, layer: usize) -> Result<Array2<f32>, NetworkError> {
        let layer = self.layer(layer)?;
        let fan_in = layer
            .neurons
            .first()
            .map_or(0, |neuron| neuron.input_weights.len());

        Ok(Array2::from_shape_fn((layer.len(), fan_in), |(o, p)| {
            layer.neurons[o].input_weights[p]
        }))
    }

    /// Bias weights of every neuron in a layer
    pub fn biases_in_layer(&self, layer: usize) -> Result<Array1<f32>, NetworkError> {
        let layer = self.layer(layer)?;
        Ok(layer.neurons.iter().map(|neuron| neuron.bias_weight).collect())
    }

    /// Number of layers, including the input layer
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Neuron count of every layer, input layer first
    pub fn layer_sizes(&self) -> Vec<usize> {
        self.layers.iter().map(NeuronLayer::len).collect()
    }

    /// Whether the network has propagated, after which no layers can be added
    pub fn is_topology_frozen(&self) -> bool {
        self.topology_frozen
    }

    /// Sets the gradient descent step size.
    ///
    /// A non-positive or non-finite value is rejected: [`DEFAULT_LEARNING_RATE`] is used
    /// instead and the error is returned so the caller can notice. The network stays usable.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If the learning rate was accepted
    /// - `Err(NetworkError::InvalidHyperparameter)` - If the default was substituted
    pub fn set_learning_rate(&mut self, learning_rate: f32) -> Result<(), NetworkError> {
        if let Err(e) = validate_learning_rate(learning_rate) {
            log::warn!(
                "Invalid learning rate: {}. Using {} instead.",
                learning_rate,
                DEFAULT_LEARNING_RATE
            );
            self.learning_rate = DEFAULT_LEARNING_RATE;
            return Err(e);
        }

        self.learning_rate = learning_rate;
        Ok(())
    }

    /// Current learning rate
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Sets the number of epochs a training driver should run
    pub fn set_num_training_epochs(&mut self, num_training_epochs: usize) {
        self.num_training_epochs = num_training_epochs;
    }

    /// Number of epochs a training driver should run
    pub fn num_training_epochs(&self) -> usize {
        self.num_training_epochs
    }

    /// Distribution new neurons draw their weights from
    pub fn weight_init(&self) -> WeightInit {
        self.weight_init
    }

    /// Uniform random number in [0, 1) from the network's generator
    pub fn random_number(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform random index in 0..len from the network's generator, `None` if `len` is 0
    pub fn random_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.random_range(0..len))
    }

    /// Compact description of the layers, such as `N784-R32-S10`.
    ///
    /// Each layer is written as its activation flag followed by its neuron count. An empty
    /// network gives an empty string and logs a warning.
    pub fn topology(&self) -> String {
        if self.layers.is_empty() {
            log::warn!("Attempted to describe the topology of an empty network");
            return String::new();
        }

        self.layers
            .iter()
            .map(|layer| format!("{}{}", layer.activation().symbol(), layer.len()))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Number of trainable parameters; the input layer has none
    pub fn param_count(&self) -> usize {
        self.layers.iter().skip(1).map(NeuronLayer::param_count).sum()
    }

    /// Prints a summary of the network's structure
    ///
    /// Displays each layer's activation, size and parameter count in a tabular format,
    /// followed by the training hyperparameters
    pub fn summary(&self) {
        if self.layers.is_empty() {
            log::warn!("Attempted to summarize an empty network");
            println!("Model: \"network\" (no layers)");
            return;
        }

        let col1_width = 33;
        let col2_width = 24;
        let col3_width = 15;
        println!("Model: \"network\"");
        println!(
            "┏{}┳{}┳{}┓",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );
        println!(
            "┃ {:<31} ┃ {:<22} ┃ {:>13} ┃",
            "Layer (activation)", "Neurons", "Param #"
        );
        println!(
            "┡{}╇{}╇{}┩",
            "━".repeat(col1_width),
            "━".repeat(col2_width),
            "━".repeat(col3_width)
        );

        for (i, layer) in self.layers.iter().enumerate() {
            // First layer is named "Input", then "Layer_1", "Layer_2", etc.
            let layer_name = if i == 0 {
                "Input".to_string()
            } else {
                format!("Layer_{}", i)
            };
            let param_count = if i == 0 { 0 } else { layer.param_count() };

            println!(
                "│ {:<31} │ {:<22} │ {:>13} │",
                format!("{} ({})", layer_name, layer.activation()),
                layer.len(),
                param_count
            );
        }
        println!(
            "└{}┴{}┴{}┘",
            "─".repeat(col1_width),
            "─".repeat(col2_width),
            "─".repeat(col3_width)
        );
        println!(" Topology: {}", self.topology());
        println!(" Total params: {}", self.param_count());
        println!(" Learning rate: {}", self.learning_rate);
        println!(" Training epochs: {}", self.num_training_epochs);
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Topology: {}, learning rate: {}, training epochs: {}",
            self.topology(),
            self.learning_rate,
            self.num_training_epochs
        )
    }
}
