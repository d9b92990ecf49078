use approx::assert_abs_diff_eq;
use ndarray::{Array1, array};
use rustynet::error::NetworkError;
use rustynet::neural_network::{
    ActivationFunction, DEFAULT_LEARNING_RATE, Network, NeuronLayer, WeightInit,
};

fn xor_topology(seed: u64) -> Network {
    let mut net = Network::with_seed(seed);
    net.add_layer(2, ActivationFunction::Identity)
        .unwrap()
        .add_layer(4, ActivationFunction::TanhSigmoid)
        .unwrap()
        .add_layer(1, ActivationFunction::TanhSigmoid)
        .unwrap();
    net
}

#[test]
fn add_layer_shapes_test() {
    let mut net = Network::with_seed(0);
    let requested = [5usize, 3, 7, 2];
    let mut previous = 0;

    for &size in &requested {
        net.add_layer(size, ActivationFunction::ReLU).unwrap();
        let layer = net.layer(net.num_layers() - 1).unwrap();
        assert_eq!(layer.len(), size);
        assert!(
            layer
                .neurons()
                .iter()
                .all(|neuron| neuron.input_weights().len() == previous)
        );
        previous = size;
    }

    assert_eq!(net.layer_sizes(), requested.to_vec());
    assert_eq!(net.weights_in_layer(2).unwrap().dim(), (7, 3));
    assert_eq!(net.weights_in_layer(0).unwrap().dim(), (5, 0));
    assert_eq!(net.biases_in_layer(3).unwrap().len(), 2);
}

#[test]
fn add_layer_rejects_empty_layer_test() {
    let mut net = Network::with_seed(0);
    assert!(matches!(
        net.add_layer(0, ActivationFunction::ReLU),
        Err(NetworkError::InvalidTopology(_))
    ));
    assert_eq!(net.num_layers(), 0);
}

#[test]
fn add_layer_after_propagation_test() {
    let mut net = xor_topology(1);
    assert!(!net.is_topology_frozen());
    net.propagate(array![1.0f32, 0.0].view()).unwrap();
    assert!(net.is_topology_frozen());

    assert!(matches!(
        net.add_layer(3, ActivationFunction::ReLU),
        Err(NetworkError::InvalidTopology(_))
    ));
    assert_eq!(net.layer_sizes(), vec![2, 4, 1]);
}

#[test]
fn rejected_inputs_leave_state_unchanged_test() {
    let mut net = xor_topology(2);
    net.propagate(array![0.3f32, 0.6].view()).unwrap();
    let before: Vec<NeuronLayer> = net.layers().to_vec();

    assert!(matches!(
        net.set_inputs(array![1.0f32, 2.0, 3.0].view()),
        Err(NetworkError::ShapeMismatch(_))
    ));
    assert!(matches!(
        net.set_inputs(array![1.0f32].view()),
        Err(NetworkError::ShapeMismatch(_))
    ));
    assert!(matches!(
        net.set_expected_output(array![1.0f32, 0.0].view()),
        Err(NetworkError::ShapeMismatch(_))
    ));
    assert!(matches!(
        net.train(array![1.0f32, 0.0].view(), array![1.0f32, 1.0].view()),
        Err(NetworkError::ShapeMismatch(_))
    ));
    assert!(matches!(
        net.propagate(array![1.0f32].view()),
        Err(NetworkError::ShapeMismatch(_))
    ));

    assert_eq!(net.layers(), before.as_slice());
}

#[test]
fn set_inputs_overwrites_input_layer_test() {
    let mut net = xor_topology(3);
    net.set_inputs(array![0.25f32, -4.0].view()).unwrap();
    let inputs = net.layer(0).unwrap().outputs();
    assert_eq!(inputs, array![0.25f32, -4.0]);
}

#[test]
fn empty_network_access_test() {
    let mut net = Network::with_seed(0);
    assert_eq!(net.loss(), Err(NetworkError::EmptyNetworkAccess));
    assert_eq!(
        net.strongest_output_neuron_idx(),
        Err(NetworkError::EmptyNetworkAccess)
    );
    assert_eq!(net.activation_vector(), Err(NetworkError::EmptyNetworkAccess));
    assert_eq!(
        net.propagate(array![1.0f32].view()),
        Err(NetworkError::EmptyNetworkAccess)
    );
    assert_eq!(
        net.train(array![1.0f32].view(), array![1.0f32].view()),
        Err(NetworkError::EmptyNetworkAccess)
    );
    assert_eq!(net.topology(), "");
    assert_eq!(net.param_count(), 0);
    net.summary();
    assert_eq!(net.to_string(), "Topology: , learning rate: 0.001, training epochs: 1");
}

#[test]
fn training_needs_two_layers_test() {
    let mut net = Network::with_seed(0);
    net.add_layer(2, ActivationFunction::Identity).unwrap();
    assert!(matches!(
        net.train(array![1.0f32, 0.0].view(), array![1.0f32, 0.0].view()),
        Err(NetworkError::InvalidTopology(_))
    ));
}

#[test]
fn loss_without_target_test() {
    let mut net = xor_topology(4);
    net.propagate(array![1.0f32, 1.0].view()).unwrap();
    assert!(matches!(net.loss(), Err(NetworkError::ShapeMismatch(_))));

    net.set_expected_output(array![0.5f32].view()).unwrap();
    let output = net.output_of_neuron(0).unwrap();
    assert_abs_diff_eq!(
        net.loss().unwrap(),
        (output - 0.5) * (output - 0.5),
        epsilon = 1e-7
    );
}

#[test]
fn train_returns_loss_before_update_test() {
    let mut net = xor_topology(5);
    let input = array![1.0f32, 0.0];
    let expected = array![1.0f32];

    let mut trained_copy = net.clone();
    trained_copy.propagate(input.view()).unwrap();
    trained_copy.set_expected_output(expected.view()).unwrap();
    let loss_before = trained_copy.loss().unwrap();

    let returned = net.train(input.view(), expected.view()).unwrap();
    assert_eq!(returned, loss_before);

    // The weights did move, so a fresh forward pass gives a different loss
    net.propagate(input.view()).unwrap();
    assert_ne!(net.loss().unwrap(), loss_before);
}

#[test]
fn repeated_training_reduces_loss_test() {
    let mut net = Network::with_seed(6);
    net.add_layer(2, ActivationFunction::Identity)
        .unwrap()
        .add_layer(1, ActivationFunction::LogSigmoid)
        .unwrap();
    net.set_learning_rate(0.5).unwrap();

    let input = array![1.0f32, 0.5];
    let expected = array![1.0f32];
    let losses: Vec<f32> = (0..500)
        .map(|_| net.train(input.view(), expected.view()).unwrap())
        .collect();

    let increases = losses.windows(2).filter(|w| w[1] > w[0]).count();
    assert!(
        increases * 20 < losses.len(),
        "loss increased in {} of {} steps",
        increases,
        losses.len()
    );

    let head: f32 = losses[..50].iter().sum::<f32>() / 50.0;
    let tail: f32 = losses[losses.len() - 50..].iter().sum::<f32>() / 50.0;
    assert!(tail < head, "tail loss {} should be below head loss {}", tail, head);
    assert!(tail < 0.01, "final loss {} should be small", tail);
}

#[test]
fn softmax_output_is_distribution_test() {
    let mut net = Network::with_options(
        Some(7),
        WeightInit::Normal {
            mean: 0.0,
            std_dev: 50.0,
        },
    )
    .unwrap();
    net.add_layer(4, ActivationFunction::Identity)
        .unwrap()
        .add_layer(6, ActivationFunction::ReLU)
        .unwrap()
        .add_layer(5, ActivationFunction::Softmax)
        .unwrap();

    let inputs = [
        array![0.0f32, 0.0, 0.0, 0.0],
        array![1.0f32, -2.0, 3.0, -4.0],
        array![100.0f32, 50.0, -75.0, 20.0],
    ];
    for input in inputs.iter() {
        net.propagate(input.view()).unwrap();
        let outputs = net.output_vector().unwrap();
        assert!(outputs.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert_abs_diff_eq!(outputs.sum(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn strongest_neuron_and_activation_vector_agree_test() {
    // A single layer is both the input and the output layer, so outputs can be set directly
    let mut net = Network::with_seed(8);
    net.add_layer(4, ActivationFunction::Identity).unwrap();

    net.propagate(array![0.2f32, 0.9, 0.9, 0.1].view()).unwrap();
    assert_eq!(net.strongest_output_neuron_idx().unwrap(), 1);
    assert_eq!(net.activation_vector().unwrap(), array![0.0f32, 1.0, 0.0, 0.0]);

    net.propagate(array![0.1f32, 0.3, 0.5, 0.2].view()).unwrap();
    assert_eq!(net.strongest_output_neuron_idx().unwrap(), 2);
    assert_eq!(net.activation_vector().unwrap(), Array1::<f32>::zeros(4));
    assert!(!net.output_neuron_fires(2).unwrap());

    net.propagate(array![-3.0f32, -2.0, -5.0, -4.0].view()).unwrap();
    assert_eq!(net.strongest_output_neuron_idx().unwrap(), 1);
    assert_eq!(net.activation_vector().unwrap(), Array1::<f32>::zeros(4));
}

#[test]
fn activation_vector_matches_strongest_on_trained_network_test() {
    let mut net = Network::with_seed(9);
    net.add_layer(3, ActivationFunction::Identity)
        .unwrap()
        .add_layer(5, ActivationFunction::LogSigmoid)
        .unwrap()
        .add_layer(4, ActivationFunction::LogSigmoid)
        .unwrap();

    for i in 0..20 {
        let x = i as f32 / 10.0;
        net.propagate(array![x, 1.0 - x, x * x].view()).unwrap();

        let strongest = net.strongest_output_neuron_idx().unwrap();
        let activations = net.activation_vector().unwrap();
        if net.output_neuron_fires(strongest).unwrap() {
            assert_eq!(activations[strongest], 1.0);
            assert_eq!(activations.sum(), 1.0);
        } else {
            assert_eq!(activations.sum(), 0.0);
        }
    }
}

#[test]
fn output_index_out_of_range_test() {
    let net = xor_topology(10);
    assert_eq!(
        net.output_of_neuron(1),
        Err(NetworkError::NeuronOutOfRange {
            index: 1,
            num_neurons: 1
        })
    );
    assert_eq!(
        net.weights_in_layer(3).unwrap_err(),
        NetworkError::LayerOutOfRange {
            index: 3,
            num_layers: 3
        }
    );
}

#[test]
fn invalid_learning_rate_falls_back_to_default_test() {
    let mut net = xor_topology(11);
    net.set_learning_rate(0.2).unwrap();
    assert_eq!(net.learning_rate(), 0.2);

    for bad in [0.0f32, -0.5, f32::NAN, f32::INFINITY] {
        assert!(matches!(
            net.set_learning_rate(bad),
            Err(NetworkError::InvalidHyperparameter(_))
        ));
        assert_eq!(net.learning_rate(), DEFAULT_LEARNING_RATE);
    }

    // Still trainable
    assert!(net
        .train(array![0.0f32, 1.0].view(), array![1.0f32].view())
        .is_ok());
}

#[test]
fn same_seed_same_network_test() {
    let mut a = xor_topology(42);
    let mut b = xor_topology(42);
    assert_eq!(a.layers(), b.layers());

    for _ in 0..10 {
        let la = a.train(array![1.0f32, 0.0].view(), array![1.0f32].view()).unwrap();
        let lb = b.train(array![1.0f32, 0.0].view(), array![1.0f32].view()).unwrap();
        assert_eq!(la, lb);
    }
    assert_eq!(a.layers(), b.layers());
    assert_eq!(a.random_number(), b.random_number());

    let c = xor_topology(43);
    assert_ne!(xor_topology(42).layers(), c.layers());
}

#[test]
fn random_helpers_test() {
    let mut net = Network::with_seed(12);
    for _ in 0..100 {
        let r = net.random_number();
        assert!((0.0..1.0).contains(&r));
        assert!(net.random_index(7).unwrap() < 7);
    }
    assert_eq!(net.random_index(0), None);
}

#[test]
fn topology_description_test() {
    let mut net = Network::with_seed(13);
    net.add_layer(784, ActivationFunction::Identity)
        .unwrap()
        .add_layer(32, ActivationFunction::LeakyReLU)
        .unwrap()
        .add_layer(16, ActivationFunction::ModifiedTanhSigmoid)
        .unwrap()
        .add_layer(10, ActivationFunction::Softmax)
        .unwrap();
    net.set_num_training_epochs(3);

    assert_eq!(net.topology(), "N784-L32-M16-S10");
    assert_eq!(net.param_count(), 784 * 32 + 32 + 32 * 16 + 16 + 16 * 10 + 10);
    assert_eq!(
        net.to_string(),
        "Topology: N784-L32-M16-S10, learning rate: 0.001, training epochs: 3"
    );
    net.summary();
}
