use crate::error::NetworkError;
use crate::neural_network::Network;
use ndarray::{Array1, Array2, ArrayView1};

/// In-memory labeled records, such as images with their class labels.
///
/// Records arrive as one flat vector plus per-record shape metadata (`rows` x `cols`) and
/// are stored one record per row of an `Array2`. Every record has a class label in
/// `0..num_categories`, which the training driver turns into a one-hot target.
///
/// # Fields
///
/// - `records` - One flattened record per row
/// - `labels` - Class label of each record
/// - `rows` - Height of a record (1 for plain vectors)
/// - `cols` - Width of a record
/// - `num_categories` - Number of classes, the size of a one-hot target
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    records: Array2<f32>,
    labels: Vec<usize>,
    rows: usize,
    cols: usize,
    num_categories: usize,
}

impl RecordSet {
    /// Builds a record set from flat data.
    ///
    /// # Parameters
    ///
    /// - `data` - All records back to back, each `rows * cols` values long, row-major
    /// - `rows` - Height of one record
    /// - `cols` - Width of one record
    /// - `labels` - One class label per record
    /// - `num_categories` - Number of classes; every label must be below it
    ///
    /// # Returns
    ///
    /// - `Ok(RecordSet)` - The record set
    /// - `Err(NetworkError::ShapeMismatch)` - If the data length, record count or labels do not agree
    pub fn from_flat(
        data: Vec<f32>,
        rows: usize,
        cols: usize,
        labels: Vec<usize>,
        num_categories: usize,
    ) -> Result<Self, NetworkError> {
        let record_len = rows * cols;
        if record_len == 0 {
            return Err(NetworkError::ShapeMismatch(String::from(
                "records must have at least one value",
            )));
        }

        if data.len() != labels.len() * record_len {
            return Err(NetworkError::ShapeMismatch(format!(
                "{} labels of {}x{} records need {} values, got {}",
                labels.len(),
                rows,
                cols,
                labels.len() * record_len,
                data.len()
            )));
        }

        if let Some(&label) = labels.iter().find(|&&label| label >= num_categories) {
            return Err(NetworkError::ShapeMismatch(format!(
                "label {} is out of range for {} categories",
                label, num_categories
            )));
        }

        let records = Array2::from_shape_vec((labels.len(), record_len), data)
            .map_err(|e| NetworkError::ShapeMismatch(format!("invalid record data: {}", e)))?;

        Ok(Self {
            records,
            labels,
            rows,
            cols,
            num_categories,
        })
    }

    /// Divides every value by `scale`, e.g. 255 to bring byte pixels into 0..1
    pub fn normalize(&mut self, scale: f32) {
        self.records.mapv_inplace(|v| v / scale);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no records
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of values in one record, rows * cols
    pub fn record_len(&self) -> usize {
        self.rows * self.cols
    }

    /// Record height
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Record width
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of classes
    pub fn num_categories(&self) -> usize {
        self.num_categories
    }

    /// The `idx`th record, flattened; panics if `idx >= len()`
    pub fn record(&self, idx: usize) -> ArrayView1<'_, f32> {
        self.records.row(idx)
    }

    /// Class label of the `idx`th record; panics if `idx >= len()`
    pub fn label(&self, idx: usize) -> usize {
        self.labels[idx]
    }

    /// Target vector for the `idx`th record: zeros with a 1 at the label
    pub fn one_hot(&self, idx: usize) -> Array1<f32> {
        let mut expected = Array1::zeros(self.num_categories);
        expected[self.labels[idx]] = 1.0;
        expected
    }
}

/// Results of one training epoch
///
/// # Fields
///
/// - `epoch` - 1-based index of the epoch
/// - `num_epochs` - Total epochs in the run
/// - `training_correct` / `training_total` - Hits on training records, scored just before training on each
/// - `validation_correct` / `validation_total` - Hits on validation records, scored before the epoch's training
/// - `mean_training_loss` - Average loss returned by the epoch's training steps
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub num_epochs: usize,
    pub training_correct: usize,
    pub training_total: usize,
    pub validation_correct: usize,
    pub validation_total: usize,
    pub mean_training_loss: f32,
}

fn percentage(correct: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        correct as f32 / total as f32 * 100.0
    }
}

impl EpochReport {
    /// Training hits as a percentage
    pub fn training_accuracy(&self) -> f32 {
        percentage(self.training_correct, self.training_total)
    }

    /// Validation hits as a percentage
    pub fn validation_accuracy(&self) -> f32 {
        percentage(self.validation_correct, self.validation_total)
    }
}

impl std::fmt::Display for EpochReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Epoch {} of {}: train = {:.3}%, validate = {:.3}%.",
            self.epoch,
            self.num_epochs,
            self.training_accuracy(),
            self.validation_accuracy()
        )
    }
}

/// Epoch loop that trains a network online on randomly drawn records.
///
/// Each epoch first scores the network on as many randomly drawn validation records as the
/// validation set holds, then draws as many training records as the training set holds,
/// scoring each one before training on it. A record counts as a hit when the network's
/// [`Network::activation_vector`] equals the record's one-hot target. Records are drawn
/// with replacement using the network's own generator.
pub struct Trainer;

impl Trainer {
    fn validate_sets(
        net: &Network,
        training: &RecordSet,
        validation: &RecordSet,
    ) -> Result<(), NetworkError> {
        let sizes = net.layer_sizes();
        let (Some(&input_size), Some(&output_size)) = (sizes.first(), sizes.last()) else {
            return Err(NetworkError::EmptyNetworkAccess);
        };

        if sizes.len() < 2 {
            return Err(NetworkError::InvalidTopology(String::from(
                "training needs at least an input and an output layer",
            )));
        }

        for (name, set) in [("training", training), ("validation", validation)] {
            if set.record_len() != input_size {
                return Err(NetworkError::ShapeMismatch(format!(
                    "{} records have {} values, but the input layer has {} neurons",
                    name,
                    set.record_len(),
                    input_size
                )));
            }
            if set.num_categories() != output_size {
                return Err(NetworkError::ShapeMismatch(format!(
                    "{} set has {} categories, but the output layer has {} neurons",
                    name,
                    set.num_categories(),
                    output_size
                )));
            }
        }

        Ok(())
    }

    fn score(net: &mut Network, set: &RecordSet, idx: usize) -> Result<bool, NetworkError> {
        net.propagate(set.record(idx))?;
        Ok(net.activation_vector()? == set.one_hot(idx))
    }

    /// Runs one epoch.
    ///
    /// # Parameters
    ///
    /// - `net` - Network to train
    /// - `training` - Records to train on
    /// - `validation` - Held-out records, only scored
    /// - `epoch` - 1-based epoch index, used in the report
    ///
    /// # Returns
    ///
    /// - `Ok(EpochReport)` - Hit counts and loss of the epoch
    /// - `Err(NetworkError)` - If the record shapes do not fit the network
    pub fn run_epoch(
        net: &mut Network,
        training: &RecordSet,
        validation: &RecordSet,
        epoch: usize,
    ) -> Result<EpochReport, NetworkError> {
        Self::validate_sets(net, training, validation)?;

        let mut validation_correct = 0;
        for _ in 0..validation.len() {
            let Some(idx) = net.random_index(validation.len()) else {
                break;
            };
            if Self::score(net, validation, idx)? {
                validation_correct += 1;
            }
        }

        let mut training_correct = 0;
        let mut total_loss = 0.0;
        for _ in 0..training.len() {
            let Some(idx) = net.random_index(training.len()) else {
                break;
            };
            if Self::score(net, training, idx)? {
                training_correct += 1;
            }

            let expected = training.one_hot(idx);
            total_loss += net.train(training.record(idx), expected.view())?;
        }

        let mean_training_loss = if training.is_empty() {
            0.0
        } else {
            total_loss / training.len() as f32
        };

        Ok(EpochReport {
            epoch,
            num_epochs: net.num_training_epochs(),
            training_correct,
            training_total: training.len(),
            validation_correct,
            validation_total: validation.len(),
            mean_training_loss,
        })
    }

    /// Runs [`Network::num_training_epochs`] epochs, handing each report to `on_epoch`.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<EpochReport>)` - One report per epoch
    /// - `Err(NetworkError)` - If the record shapes do not fit the network
    pub fn run<F>(
        net: &mut Network,
        training: &RecordSet,
        validation: &RecordSet,
        mut on_epoch: F,
    ) -> Result<Vec<EpochReport>, NetworkError>
    where
        F: FnMut(&EpochReport),
    {
        Self::validate_sets(net, training, validation)?;

        log::info!(
            "Training {} on {}/{} records",
            net.topology(),
            training.len(),
            validation.len()
        );

        let num_epochs = net.num_training_epochs();
        let mut reports = Vec::with_capacity(num_epochs);
        for epoch in 1..=num_epochs {
            let report = Self::run_epoch(net, training, validation, epoch)?;
            log::info!("{}", report);
            on_epoch(&report);
            reports.push(report);
        }

        log::info!("Training finished");
        Ok(reports)
    }
}
