/// Module that contains the neuron record held by each layer
pub mod neuron;

pub use neuron::*;

use crate::error::NetworkError;
use crate::neural_network::{ActivationFunction, WeightInit};
use ndarray::Array1;
use rand::Rng;

/// An ordered, fixed-size group of neurons sharing one activation function.
///
/// Neurons are stored by value and addressed by position; the `o`th input weight of every
/// neuron in the following layer belongs to the connection from this layer's `o`th neuron.
///
/// # Fields
///
/// - `neurons` - The layer's neurons, never resized after construction
/// - `activation` - Activation tag applied to every neuron of the layer
#[derive(Debug, Clone, PartialEq)]
pub struct NeuronLayer {
    pub(crate) neurons: Vec<Neuron>,
    activation: ActivationFunction,
}

impl NeuronLayer {
    /// Creates a layer of `num_neurons` neurons, each with `fan_in` input weights.
    ///
    /// # Parameters
    ///
    /// - `num_neurons` - Number of neurons in the layer
    /// - `fan_in` - Size of the preceding layer, 0 for the input layer
    /// - `activation` - Activation function of the layer
    /// - `init` - Distribution the weights are drawn from
    /// - `rng` - The owning network's generator
    ///
    /// # Returns
    ///
    /// - `Ok(NeuronLayer)` - The initialized layer
    /// - `Err(NetworkError::InvalidHyperparameter)` - If the weight distribution is invalid
    pub fn new<R: Rng + ?Sized>(
        num_neurons: usize,
        fan_in: usize,
        activation: ActivationFunction,
        init: &WeightInit,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let neurons = (0..num_neurons)
            .map(|_| Neuron::new(fan_in, init, rng))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            neurons,
            activation,
        })
    }

    /// Activation function of the layer
    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    /// Number of neurons in the layer
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Whether the layer has no neurons
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Read-only access to the neurons
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// Outputs of all neurons, in order
    pub fn outputs(&self) -> Array1<f32> {
        self.neurons.iter().map(|neuron| neuron.output).collect()
    }

    /// Number of trainable parameters (input weights plus biases)
    pub fn param_count(&self) -> usize {
        self.neurons
            .iter()
            .map(|neuron| neuron.input_weights.len() + 1)
            .sum()
    }
}
