use serde::{Deserialize, Serialize};

/// Optimizer 전체 구성
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 학습률 (픽셀 값 단위)
    pub learning_rate: f32,
    /// Adam 구성
    pub adam: AdamConfig,
}

/// Adam 옵티마이저 구성
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdamConfig {
    /// 베타1 파라미터 (1차 모멘트 지수 감소율)
    pub beta1: f32,
    /// 베타2 파라미터 (2차 모멘트 지수 감소율)
    pub beta2: f32,
    /// 엡실론 (분모 안정화 항)
    pub epsilon: f32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.02,
            adam: AdamConfig::default(),
        }
    }
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            beta1: 0.99,
            beta2: 0.999,
            epsilon: 1e-1,
        }
    }
}

impl OptimizerConfig {
    /// 새 구성 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// Adam 구성 설정
    pub fn with_adam_config(mut self, config: AdamConfig) -> Self {
        self.adam = config;
        self
    }

    /// 학습률 설정
    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = lr;
        self
    }

    /// 구성 값 검증. 문제가 있으면 사유를 돌려준다.
    pub fn check(&self) -> Option<String> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Some(format!("학습률은 양수여야 함: {}", self.learning_rate));
        }
        for (name, beta) in [("beta1", self.adam.beta1), ("beta2", self.adam.beta2)] {
            if !(0.0..1.0).contains(&beta) {
                return Some(format!("{}는 [0, 1) 범위여야 함: {}", name, beta));
            }
        }
        if !(self.adam.epsilon.is_finite() && self.adam.epsilon > 0.0) {
            return Some(format!("epsilon은 양수여야 함: {}", self.adam.epsilon));
        }
        None
    }
}
