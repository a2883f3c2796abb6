use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StyleError};
use crate::core::extractor::{Preprocessing, DEFAULT_WEIGHTS_REPO};
use crate::core::loss::LossWeights;
use crate::core::optimizers::{OptimizerConfig, StepBudget};

/// 스타일 전이 실행 전체 구성
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// 스냅샷 횟수
    pub epochs: usize,
    /// 스냅샷 사이의 스텝 수
    pub steps_per_epoch: usize,
    /// 입력 이미지 긴 변 길이 (실행 시간은 대략 제곱에 비례)
    pub max_input_dimension: u32,
    pub style_weight: f32,
    pub content_weight: f32,
    pub total_variation_weight: f32,
    pub optimizer: OptimizerConfig,
    pub content_layers: Vec<String>,
    pub style_layers: Vec<String>,
    pub preprocessing: Preprocessing,
    /// 에폭별 스냅샷 저장 위치
    pub output_dir: PathBuf,
    /// 원격 이미지 캐시 위치
    pub cache_dir: PathBuf,
    /// 로컬 가중치 파일. 없으면 `weights_repo`에서 받는다.
    pub weights: Option<PathBuf>,
    pub weights_repo: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            steps_per_epoch: 100,
            max_input_dimension: 512,
            style_weight: 1e-2,
            content_weight: 1e4,
            total_variation_weight: 1e8,
            optimizer: OptimizerConfig::default(),
            content_layers: vec!["block5_conv2".to_string()],
            style_layers: [
                "block1_conv1",
                "block2_conv1",
                "block3_conv1",
                "block4_conv1",
                "block5_conv1",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            preprocessing: Preprocessing::default(),
            output_dir: PathBuf::from("."),
            cache_dir: PathBuf::from("./cache"),
            weights: None,
            weights_repo: DEFAULT_WEIGHTS_REPO.to_string(),
        }
    }
}

impl TransferConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON 파일에서 로드. 빠진 필드는 기본값.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn with_budget(mut self, epochs: usize, steps_per_epoch: usize) -> Self {
        self.epochs = epochs;
        self.steps_per_epoch = steps_per_epoch;
        self
    }

    pub fn with_max_input_dimension(mut self, dim: u32) -> Self {
        self.max_input_dimension = dim;
        self
    }

    pub fn with_layers(mut self, style_layers: &[&str], content_layers: &[&str]) -> Self {
        self.style_layers = style_layers.iter().map(|s| s.to_string()).collect();
        self.content_layers = content_layers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn loss_weights(&self) -> LossWeights {
        LossWeights {
            style: self.style_weight,
            content: self.content_weight,
            total_variation: self.total_variation_weight,
        }
    }

    pub fn budget(&self) -> StepBudget {
        StepBudget {
            epochs: self.epochs,
            steps_per_epoch: self.steps_per_epoch,
        }
    }

    /// 레이어 목록 중 네트워크에서 가장 깊은 레이어 (트렁크 절단 기준)
    pub fn deepest_layer(&self) -> Option<&str> {
        self.style_layers
            .iter()
            .chain(self.content_layers.iter())
            .filter_map(|name| crate::core::extractor::layer_position(name).map(|p| (p, name.as_str())))
            .max_by_key(|(p, _)| *p)
            .map(|(_, name)| name)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(StyleError::InvalidConfig(msg));

        if self.epochs == 0 || self.steps_per_epoch == 0 {
            return fail(format!(
                "epochs/steps_per_epoch는 양수여야 함: {}/{}",
                self.epochs, self.steps_per_epoch
            ));
        }
        if self.max_input_dimension == 0 {
            return fail("max_input_dimension은 양수여야 함".to_string());
        }
        for (name, w) in [
            ("style_weight", self.style_weight),
            ("content_weight", self.content_weight),
            ("total_variation_weight", self.total_variation_weight),
        ] {
            if !(w.is_finite() && w >= 0.0) {
                return fail(format!("{}는 0 이상의 유한값이어야 함: {}", name, w));
            }
        }
        if self.style_layers.is_empty() || self.content_layers.is_empty() {
            return fail("스타일/콘텐츠 레이어가 하나 이상 필요함".to_string());
        }
        if let Some(reason) = self.optimizer.check() {
            return fail(reason);
        }
        Ok(())
    }
}
