use ndarray::{Array1, ArrayView1};

/// Mean Squared Error over one output vector
///
/// # Example
///
/// ```rust
/// use rustynet::neural_network::MeanSquaredError;
/// use ndarray::array;
///
/// let expected = array![0.0, 1.0];
/// let output = array![0.5, 0.5];
///
/// let loss = MeanSquaredError::compute_loss(expected.view(), output.view());
/// assert!((loss - 0.25).abs() < 1e-6);
/// ```
pub struct MeanSquaredError;

impl MeanSquaredError {
    /// Computes (1/N) * sum((y_pred - y_true)^2).
    ///
    /// # Parameters
    ///
    /// - `y_true` - Expected output
    /// - `y_pred` - Output produced by the network, same length as `y_true`
    ///
    /// # Returns
    ///
    /// * `f32` - The mean squared error, 0 for empty vectors
    pub fn compute_loss(y_true: ArrayView1<f32>, y_pred: ArrayView1<f32>) -> f32 {
        if y_pred.is_empty() {
            return 0.0;
        }

        let squared_diff = (&y_pred - &y_true).mapv(|x| x * x);
        let n = squared_diff.len() as f32;
        squared_diff.sum() / n
    }

    /// Error signal fed into the output layer's deltas, y_pred - y_true.
    ///
    /// This is the squared-error gradient without its constant 2/N factor, which the
    /// learning rate absorbs.
    pub fn output_error(y_true: ArrayView1<f32>, y_pred: ArrayView1<f32>) -> Array1<f32> {
        &y_pred - &y_true
    }
}
