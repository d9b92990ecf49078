use crate::error::NetworkError;
use ndarray::ArrayViewMut1;
use std::str::FromStr;

/// Slope applied to negative inputs by the leaky ReLU
pub const LEAKY_RELU_SLOPE: f32 = 0.01;

/// Output amplitude of the modified tanh sigmoid, 1.7159 * tanh(2x / 3)
pub const MODIFIED_TANH_AMPLITUDE: f32 = 1.7159;

/// Input slope of the modified tanh sigmoid
pub const MODIFIED_TANH_SLOPE: f32 = 2.0 / 3.0;

/// Activation function tag shared by all neurons of a layer.
///
/// The set is closed, so dispatch happens through `match` on the tag instead of trait objects.
/// Each variant pairs a forward function with its derivative, where the derivative is expressed
/// in terms of the neuron's *output* (the value the network caches), not its weighted sum.
///
/// # Variants
///
/// - `Identity` - No activation; the weighted sum is passed through (the `none` tag, flag `N`)
/// - `ReLU` - max(0, x) (flag `R`)
/// - `LeakyReLU` - x for x > 0, 0.01 * x otherwise (flag `L`)
/// - `TanhSigmoid` - tanh(x) (flag `T`)
/// - `LogSigmoid` - 1 / (1 + e^-x) (flag `G`)
/// - `ModifiedTanhSigmoid` - 1.7159 * tanh(2x / 3) (flag `M`)
/// - `Softmax` - Whole-layer normalization of the output layer, applied after its weighted sums are known (flag `S`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationFunction {
    Identity,
    ReLU,
    LeakyReLU,
    TanhSigmoid,
    LogSigmoid,
    ModifiedTanhSigmoid,
    Softmax,
}

impl ActivationFunction {
    /// Every activation tag, in flag order
    pub const ALL: [ActivationFunction; 7] = [
        ActivationFunction::Identity,
        ActivationFunction::ReLU,
        ActivationFunction::LeakyReLU,
        ActivationFunction::TanhSigmoid,
        ActivationFunction::LogSigmoid,
        ActivationFunction::ModifiedTanhSigmoid,
        ActivationFunction::Softmax,
    ];

    /// Applies the activation to a neuron's weighted input sum.
    ///
    /// Softmax cannot be computed from a single sum, so for `Softmax` the raw sum is returned
    /// unchanged; an output layer is normalized afterwards with [`softmax_in_place`].
    ///
    /// # Parameters
    ///
    /// * `sum` - Bias plus the weighted sum of the preceding layer's outputs
    ///
    /// # Returns
    ///
    /// * `f32` - The neuron's output
    pub fn apply(self, sum: f32) -> f32 {
        match self {
            ActivationFunction::Identity => sum,
            ActivationFunction::ReLU => {
                if sum > 0.0 {
                    sum
                } else {
                    0.0
                }
            }
            ActivationFunction::LeakyReLU => {
                if sum > 0.0 {
                    sum
                } else {
                    LEAKY_RELU_SLOPE * sum
                }
            }
            ActivationFunction::TanhSigmoid => sum.tanh(),
            ActivationFunction::LogSigmoid => 1.0 / (1.0 + (-sum).exp()),
            ActivationFunction::ModifiedTanhSigmoid => {
                MODIFIED_TANH_AMPLITUDE * (MODIFIED_TANH_SLOPE * sum).tanh()
            }
            ActivationFunction::Softmax => sum,
        }
    }

    /// Derivative of the activation, evaluated from the neuron's output.
    ///
    /// The softmax derivative is taken to be 1. This is a simplification that only holds
    /// while softmax is the final layer and the error term is the plain output difference;
    /// the full softmax Jacobian is not computed.
    ///
    /// # Parameters
    ///
    /// * `output` - The output the neuron produced in the last forward pass
    ///
    /// # Returns
    ///
    /// * `f32` - d(output)/d(sum) at that output
    pub fn derivative(self, output: f32) -> f32 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => {
                if output > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::LeakyReLU => {
                if output > 0.0 {
                    1.0
                } else {
                    LEAKY_RELU_SLOPE
                }
            }
            ActivationFunction::TanhSigmoid => 1.0 - output * output,
            ActivationFunction::LogSigmoid => output * (1.0 - output),
            ActivationFunction::ModifiedTanhSigmoid => {
                MODIFIED_TANH_SLOPE
                    * (MODIFIED_TANH_AMPLITUDE - output * output / MODIFIED_TANH_AMPLITUDE)
            }
            ActivationFunction::Softmax => 1.0,
        }
    }

    /// Whether the activation needs the whole layer's sums before it can be applied
    pub fn is_layer_wide(self) -> bool {
        self == ActivationFunction::Softmax
    }

    /// Single-letter flag for this activation, as used in topology strings like `N784-R32-S10`
    pub fn symbol(self) -> char {
        match self {
            ActivationFunction::Identity => 'N',
            ActivationFunction::ReLU => 'R',
            ActivationFunction::LeakyReLU => 'L',
            ActivationFunction::TanhSigmoid => 'T',
            ActivationFunction::LogSigmoid => 'G',
            ActivationFunction::ModifiedTanhSigmoid => 'M',
            ActivationFunction::Softmax => 'S',
        }
    }

    /// Lowercase name of the activation
    pub fn name(self) -> &'static str {
        match self {
            ActivationFunction::Identity => "none",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::LeakyReLU => "leaky_relu",
            ActivationFunction::TanhSigmoid => "tanh_sigmoid",
            ActivationFunction::LogSigmoid => "log_sigmoid",
            ActivationFunction::ModifiedTanhSigmoid => "modified_tanh_sigmoid",
            ActivationFunction::Softmax => "softmax",
        }
    }

    /// Resolves a single-letter layer flag into its activation.
    ///
    /// # Parameters
    ///
    /// * `flag` - One of `N`, `R`, `L`, `T`, `G`, `M`, `S`
    ///
    /// # Returns
    ///
    /// - `Ok(ActivationFunction)` - The activation for the flag
    /// - `Err(NetworkError::UnknownActivationTag)` - If no activation uses this flag
    pub fn from_flag(flag: char) -> Result<Self, NetworkError> {
        ActivationFunction::ALL
            .into_iter()
            .find(|activation| activation.symbol() == flag)
            .ok_or_else(|| {
                log::warn!("Unknown activation flag '{}'", flag);
                NetworkError::UnknownActivationTag(flag.to_string())
            })
    }
}

impl FromStr for ActivationFunction {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        match tag.as_str() {
            "none" | "identity" | "linear" => Ok(ActivationFunction::Identity),
            "relu" => Ok(ActivationFunction::ReLU),
            "leaky_relu" | "leakyrelu" => Ok(ActivationFunction::LeakyReLU),
            "tanh_sigmoid" | "tanh" => Ok(ActivationFunction::TanhSigmoid),
            "log_sigmoid" | "sigmoid" => Ok(ActivationFunction::LogSigmoid),
            "modified_tanh_sigmoid" | "mtanh_sigmoid" => {
                Ok(ActivationFunction::ModifiedTanhSigmoid)
            }
            "softmax" => Ok(ActivationFunction::Softmax),
            _ => {
                log::warn!("Unknown activation name '{}'", s);
                Err(NetworkError::UnknownActivationTag(s.to_string()))
            }
        }
    }
}

impl std::fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Replaces raw sums with their softmax, in place.
///
/// The maximum is subtracted from every value before exponentiating so that large sums
/// cannot overflow, then each value is divided by the sum of the exponentials.
///
/// # Parameters
///
/// * `values` - Raw weighted sums of one layer; overwritten with probabilities summing to 1
pub fn softmax_in_place(mut values: ArrayViewMut1<f32>) {
    if values.is_empty() {
        return;
    }

    let max_val = values.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    values.mapv_inplace(|x| (x - max_val).exp());
    let sum = values.sum();
    values.mapv_inplace(|x| x / sum);
}
