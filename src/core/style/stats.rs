use candle_core::Tensor;

use super::model::LayerMap;
use crate::core::error::Result;

/// 레이어 텐서 요약 (형상, 최소, 최대, 평균)
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStats {
    pub name: String,
    pub shape: Vec<usize>,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl LayerStats {
    pub fn of(name: &str, tensor: &Tensor) -> Result<Self> {
        let flat = tensor.flatten_all()?;
        Ok(Self {
            name: name.to_string(),
            shape: tensor.dims().to_vec(),
            min: flat.min(0)?.to_scalar::<f32>()?,
            max: flat.max(0)?.to_scalar::<f32>()?,
            mean: flat.mean_all()?.to_scalar::<f32>()?,
        })
    }
}

impl std::fmt::Display for LayerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} shape={:?} min={:.4} max={:.4} mean={:.4}",
            self.name, self.shape, self.min, self.max, self.mean
        )
    }
}

/// 번들의 모든 항목 요약 (이름 순)
pub fn summarize(layers: &LayerMap) -> Result<Vec<LayerStats>> {
    layers.iter().map(|(name, t)| LayerStats::of(name, t)).collect()
}

/// 요약을 info 레벨로 기록
pub fn log_summary(title: &str, layers: &LayerMap) -> Result<()> {
    log::info!("{}:", title);
    for stats in summarize(layers)? {
        log::info!("  {}", stats);
    }
    Ok(())
}
