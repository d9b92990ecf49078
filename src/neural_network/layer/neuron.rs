use crate::error::NetworkError;
use crate::neural_network::WeightInit;
use ndarray::Array1;
use rand::Rng;

/// A single scalar unit of the network.
///
/// # Fields
///
/// - `output` - Activation produced by the last forward pass (or the bound input value for input neurons)
/// - `delta` - Error term from the last backward pass
/// - `bias_weight` - Trainable bias added to the weighted input sum
/// - `input_weights` - One trainable weight per neuron of the preceding layer, indexed like that layer
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    pub(crate) output: f32,
    pub(crate) delta: f32,
    pub(crate) bias_weight: f32,
    pub(crate) input_weights: Array1<f32>,
}

impl Neuron {
    /// Creates a neuron connected to `fan_in` neurons of the preceding layer.
    ///
    /// The input weights are drawn first, then the bias, all from the same distribution.
    ///
    /// # Parameters
    ///
    /// - `fan_in` - Size of the preceding layer (0 for the input layer)
    /// - `init` - Distribution to draw from
    /// - `rng` - The owning network's generator
    ///
    /// # Returns
    ///
    /// - `Ok(Neuron)` - A freshly initialized neuron with zero output and delta
    /// - `Err(NetworkError::InvalidHyperparameter)` - If the distribution is invalid
    pub fn new<R: Rng + ?Sized>(
        fan_in: usize,
        init: &WeightInit,
        rng: &mut R,
    ) -> Result<Self, NetworkError> {
        let mut values = init.sample(fan_in, fan_in + 1, rng)?;
        let bias_weight = values.pop().unwrap_or(0.0);

        Ok(Self {
            output: 0.0,
            delta: 0.0,
            bias_weight,
            input_weights: Array1::from(values),
        })
    }

    /// Last computed output
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Last computed error term
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Bias weight
    pub fn bias_weight(&self) -> f32 {
        self.bias_weight
    }

    /// Weights of the connections from the preceding layer
    pub fn input_weights(&self) -> &Array1<f32> {
        &self.input_weights
    }

    /// Bias plus the weighted sum of `inputs`, which must be the preceding layer's outputs
    pub(crate) fn weighted_sum(&self, inputs: &Array1<f32>) -> f32 {
        self.bias_weight + self.input_weights.dot(inputs)
    }
}
