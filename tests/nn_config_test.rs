use rustynet::error::NetworkError;
use rustynet::neural_network::{
    ActivationFunction, DEFAULT_LEARNING_RATE, NetworkConfig, WeightInit,
};

#[test]
fn build_from_flags_test() {
    let mut config = NetworkConfig::new().with_layer(784, ActivationFunction::Identity);
    for (flag, size) in [('R', 64), ('L', 32), ('T', 16), ('G', 16), ('M', 8)] {
        config = config.with_flag_layer(flag, size).unwrap();
    }
    let net = config
        .with_flag_layer('S', 10)
        .unwrap()
        .with_learning_rate(0.05)
        .with_num_training_epochs(7)
        .with_seed(5)
        .build()
        .unwrap();

    assert_eq!(net.topology(), "N784-R64-L32-T16-G16-M8-S10");
    assert_eq!(net.learning_rate(), 0.05);
    assert_eq!(net.num_training_epochs(), 7);
}

#[test]
fn unknown_flag_test() {
    let result = NetworkConfig::new().with_flag_layer('Q', 4);
    assert_eq!(
        result.unwrap_err(),
        NetworkError::UnknownActivationTag(String::from("Q"))
    );
}

#[test]
fn invalid_learning_rate_uses_default_test() {
    let net = NetworkConfig::new()
        .with_layer(2, ActivationFunction::Identity)
        .with_layer(1, ActivationFunction::LogSigmoid)
        .with_learning_rate(-1.0)
        .build()
        .unwrap();
    assert_eq!(net.learning_rate(), DEFAULT_LEARNING_RATE);
}

#[test]
fn invalid_topology_test() {
    let result = NetworkConfig::new()
        .with_layer(2, ActivationFunction::Identity)
        .with_layer(0, ActivationFunction::ReLU)
        .build();
    assert!(matches!(result, Err(NetworkError::InvalidTopology(_))));
}

#[test]
fn invalid_weight_init_test() {
    let result = NetworkConfig::new()
        .with_layer(2, ActivationFunction::Identity)
        .with_weight_init(WeightInit::Normal {
            mean: 0.0,
            std_dev: -1.0,
        })
        .build();
    assert!(matches!(
        result,
        Err(NetworkError::InvalidHyperparameter(_))
    ));
}

#[test]
fn seeded_configs_build_identical_networks_test() {
    let config = NetworkConfig::new()
        .with_layer(3, ActivationFunction::Identity)
        .with_layer(5, ActivationFunction::ReLU)
        .with_layer(2, ActivationFunction::Softmax)
        .with_seed(77);

    let a = config.build().unwrap();
    let b = config.build().unwrap();
    assert_eq!(a.layers(), b.layers());
    assert_eq!(a.weight_init(), WeightInit::ScaledNormal);
}

#[test]
fn normal_weight_init_spread_test() {
    let net = NetworkConfig::new()
        .with_layer(50, ActivationFunction::Identity)
        .with_layer(40, ActivationFunction::TanhSigmoid)
        .with_weight_init(WeightInit::Normal {
            mean: 2.0,
            std_dev: 0.1,
        })
        .with_seed(3)
        .build()
        .unwrap();

    let weights = net.weights_in_layer(1).unwrap();
    let mean = weights.mean().unwrap();
    assert!((mean - 2.0).abs() < 0.05, "mean weight {}", mean);
    assert!(weights.iter().all(|&w| (1.4..2.6).contains(&w)));
}
