use rustynet::error::NetworkError;
use rustynet::neural_network::XorBenchmark;

#[test]
fn xor_benchmark_learns_xor_test() {
    // Documented topology, epoch count and learning rate, fewer trials
    let benchmark = XorBenchmark {
        num_trials: 20,
        seed: Some(2018),
        ..XorBenchmark::default()
    };

    let report = benchmark.run().unwrap();
    println!("{}", report);

    assert_eq!(report.num_trials, 20);
    assert!(
        report.percent_correct >= 90.0,
        "only {:.1}% of trials learned XOR",
        report.percent_correct
    );
    assert!(report.mean_final_loss < 0.05);
}

#[test]
fn xor_benchmark_is_reproducible_test() {
    let benchmark = XorBenchmark::new(6, 300, 0.05).unwrap().with_seed(7);
    let first = benchmark.run().unwrap();
    let second = benchmark.run().unwrap();
    assert_eq!(first, second);
}

#[test]
fn xor_benchmark_rejects_invalid_configuration_test() {
    assert!(matches!(
        XorBenchmark::new(0, 10, 0.01),
        Err(NetworkError::InvalidHyperparameter(_))
    ));
    assert!(matches!(
        XorBenchmark::new(5, 10, -0.01),
        Err(NetworkError::InvalidHyperparameter(_))
    ));

    let benchmark = XorBenchmark {
        learning_rate: 0.0,
        ..XorBenchmark::default()
    };
    assert!(benchmark.run().is_err());
}

#[test]
fn xor_defaults_test() {
    let benchmark = XorBenchmark::default();
    assert_eq!(benchmark.num_trials, 200);
    assert_eq!(benchmark.num_epochs, 50_000);
    assert_eq!(benchmark.learning_rate, 0.01);
}
