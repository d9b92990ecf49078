/// Module that contains the activation function family
pub mod activation;
/// Module that contains network configuration
pub mod config;
/// Module that contains the layer and neuron records
pub mod layer;
/// Module that contains the loss function
pub mod loss_function;
/// Module that contains the network engine
pub mod network;
/// Module that contains the epoch-based training driver
pub mod trainer;
/// Module that contains weight initialization
pub mod weight_init;

pub use activation::*;
pub use config::*;
pub use layer::*;
pub use loss_function::*;
pub use network::{DEFAULT_LEARNING_RATE, DEFAULT_TRAINING_EPOCHS, FIRING_THRESHOLD, Network};
pub use self_test::*;
pub use trainer::*;
pub use weight_init::*;
