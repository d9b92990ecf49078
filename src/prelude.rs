pub use crate::error::NetworkError;
pub use crate::neural_network::{
    ActivationFunction, EpochReport, FIRING_THRESHOLD, MeanSquaredError, Network, NetworkConfig,
    Neuron, NeuronLayer, RecordSet, Trainer, WeightInit, XorBenchmark, XorReport,
};
