use crate::core::optimizers::{AdamConfig, OptimizerConfig};

#[test]
fn 옵티마이저구성_기본값_테스트() {
    let config = OptimizerConfig::default();

    assert_eq!(config.learning_rate, 0.02, "학습률 기본값");
    assert_eq!(config.adam.beta1, 0.99, "Adam beta1 기본값");
    assert_eq!(config.adam.beta2, 0.999, "Adam beta2 기본값");
    assert_eq!(config.adam.epsilon, 1e-1, "Adam epsilon 기본값");
    assert!(config.check().is_none());

    println!("✅ 옵티마이저 구성 기본값 테스트 통과");
}

#[test]
fn 옵티마이저구성_체이닝_테스트() {
    let adam_config = AdamConfig {
        beta1: 0.95,
        beta2: 0.9999,
        epsilon: 1e-7,
    };

    let config = OptimizerConfig::new()
        .with_adam_config(adam_config.clone())
        .with_learning_rate(0.005);

    assert_eq!(config.adam, adam_config);
    assert_eq!(config.learning_rate, 0.005);
    assert_eq!(OptimizerConfig::new(), OptimizerConfig::default(), "new()와 default() 동일성");
}

#[test]
fn 옵티마이저구성_검증_테스트() {
    assert!(OptimizerConfig::new().with_learning_rate(0.0).check().is_some());
    assert!(OptimizerConfig::new().with_learning_rate(f32::NAN).check().is_some());

    let bad_beta = OptimizerConfig::new().with_adam_config(AdamConfig {
        beta1: 1.0,
        ..AdamConfig::default()
    });
    assert!(bad_beta.check().unwrap().contains("beta1"));

    let bad_eps = OptimizerConfig::new().with_adam_config(AdamConfig {
        epsilon: 0.0,
        ..AdamConfig::default()
    });
    assert!(bad_eps.check().is_some());
}
