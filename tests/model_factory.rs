//! Integration tests for the model factory
//!
//! Every in-bounds candidate yields a classifier whose 26-unit output layer
//! is a probability distribution for any valid input image.

use afinar::model::{Architecture, ModelConfig, ModelFactory, Stage};
use afinar::optim::hpo::Candidate;
use afinar::ConfigurationError;
use ndarray::Array4;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reference topology at a reduced input size
fn small_factory() -> ModelFactory {
    ModelFactory::new(ModelConfig { image_size: 16, ..Default::default() }).unwrap()
}

#[test]
fn test_reference_architecture() {
    let factory = ModelFactory::default();
    let arch = factory.architecture();
    assert_eq!(arch.stages().len(), Architecture::STAGES);
    assert_eq!(arch.output_units(), 26);
    assert_eq!(arch.num_parameters(), 198_778_948);
    assert_eq!(arch.stages()[0], Stage::Standardize);
    assert!(matches!(
        arch.stages()[1],
        Stage::Conv2d { filters: 64, kernel: 11, regularized: false, .. }
    ));
}

#[test]
fn test_out_of_bounds_candidates_rejected() {
    let factory = ModelFactory::default();
    for (lr, reg) in [(1e-6, 1e-5), (2e-2, 1e-5), (1e-3, 1e-8), (1e-3, 1e-3)] {
        assert!(matches!(
            factory.build_candidate(&Candidate::new(lr, reg)),
            Err(ConfigurationError::OutOfBounds { .. })
        ));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    #[test]
    fn prop_output_is_distribution_over_26_classes(
        lr in 1e-5f64..=1e-2,
        reg in 1e-7f64..=1e-4,
        seed in 0u64..1000,
    ) {
        let classifier = small_factory().build(lr, reg).unwrap();
        prop_assert_eq!(classifier.classes(), 26);

        let mut rng = StdRng::seed_from_u64(seed);
        let images = Array4::from_shape_fn((2, 16, 16, 3), |_| rng.random_range(0.0..255.0));
        let mut network = classifier.instantiate(seed);
        let proba = network.predict_proba(&images).unwrap();

        prop_assert_eq!(proba.dim(), (2, 26));
        for row in proba.rows() {
            prop_assert!((row.sum() - 1.0).abs() < 1e-4);
            prop_assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }
}
