use crate::error::NetworkError;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Distribution that new neurons draw their input weights and bias from.
///
/// # Variants
///
/// - `Normal` - Plain normal distribution with the given mean and standard deviation
/// - `ScaledNormal` - Standard normal scaled by 1 / sqrt(fan_in), where fan_in is the preceding
///   layer's size (LeCun initialization). Neurons of the first layer have no inputs and use a
///   scale of 1 for their bias.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeightInit {
    Normal { mean: f32, std_dev: f32 },
    #[default]
    ScaledNormal,
}

impl WeightInit {
    /// Checks that the distribution can be sampled from.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - If the parameters are finite and the standard deviation is not negative
    /// - `Err(NetworkError::InvalidHyperparameter)` - Otherwise
    pub fn validate(&self) -> Result<(), NetworkError> {
        if let WeightInit::Normal { mean, std_dev } = *self {
            if !(mean.is_finite() && std_dev.is_finite() && std_dev >= 0.0) {
                return Err(NetworkError::InvalidHyperparameter(format!(
                    "weight distribution needs a finite mean and a non-negative finite std_dev, got mean = {}, std_dev = {}",
                    mean, std_dev
                )));
            }
        }
        Ok(())
    }

    /// Builds the sampler for a neuron with `fan_in` inputs.
    ///
    /// # Parameters
    ///
    /// * `fan_in` - Number of neurons in the preceding layer
    ///
    /// # Returns
    ///
    /// - `Ok(Normal<f32>)` - Distribution to draw the weights and bias from
    /// - `Err(NetworkError::InvalidHyperparameter)` - If the distribution parameters are invalid
    pub fn distribution(&self, fan_in: usize) -> Result<Normal<f32>, NetworkError> {
        let (mean, std_dev) = match *self {
            WeightInit::Normal { mean, std_dev } => (mean, std_dev),
            WeightInit::ScaledNormal => (0.0, 1.0 / (fan_in.max(1) as f32).sqrt()),
        };

        Normal::new(mean, std_dev).map_err(|e| {
            NetworkError::InvalidHyperparameter(format!(
                "cannot build weight distribution: {}",
                e
            ))
        })
    }

    /// Draws `count` values from the distribution for the given fan-in
    pub fn sample<R: Rng + ?Sized>(
        &self,
        fan_in: usize,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<f32>, NetworkError> {
        let normal = self.distribution(fan_in)?;
        Ok((0..count).map(|_| normal.sample(rng)).collect())
    }
}
