use candle_core::Tensor;

use crate::core::error::{Result, StyleError};
use crate::core::style::{LayerMap, StyleContentOutput, TargetBundle};

/// 세 손실 항의 가중치
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossWeights {
    pub style: f32,
    pub content: f32,
    pub total_variation: f32,
}

impl Default for LossWeights {
    fn default() -> Self {
        Self {
            style: 1e-2,
            content: 1e4,
            total_variation: 1e8,
        }
    }
}

/// 같은 평가 패스에서 나온 가중 손실 항들
#[derive(Debug, Clone)]
pub struct ComposedLoss {
    pub style: Tensor,
    pub content: Tensor,
    pub total_variation: Tensor,
    pub total: Tensor,
}

/// 로그용 스칼라 값
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossBreakdown {
    pub style: f32,
    pub content: f32,
    pub total_variation: f32,
    pub total: f32,
}

impl ComposedLoss {
    pub fn breakdown(&self) -> Result<LossBreakdown> {
        Ok(LossBreakdown {
            style: self.style.to_scalar::<f32>()?,
            content: self.content.to_scalar::<f32>()?,
            total_variation: self.total_variation.to_scalar::<f32>()?,
            total: self.total.to_scalar::<f32>()?,
        })
    }
}

/// 모집단 평균 제곱 오차 (원소 수로 나눔)
pub fn mean_squared_error(current: &Tensor, target: &Tensor) -> Result<Tensor> {
    Ok(current.sub(target)?.sqr()?.mean_all()?)
}

/// 레이어별 MSE의 합에 `weight / 레이어 수`를 곱한다
fn layered_loss(current: &LayerMap, target: &LayerMap, weight: f32) -> Result<Tensor> {
    let mut sum: Option<Tensor> = None;
    for (name, value) in current {
        let expected = target
            .get(name)
            .ok_or_else(|| StyleError::InvalidLayerName(name.clone()))?;
        let term = mean_squared_error(value, expected)?;
        sum = Some(match sum {
            Some(acc) => (acc + term)?,
            None => term,
        });
    }

    match sum {
        Some(sum) => Ok((sum * (weight as f64 / current.len() as f64))?),
        None => Err(StyleError::InvalidConfig("손실을 계산할 레이어가 없음".to_string())),
    }
}

/// 스타일 손실: Gram 통계 MSE 합 x style_weight / 스타일 레이어 수
pub fn style_loss(current: &LayerMap, target: &LayerMap, weight: f32) -> Result<Tensor> {
    layered_loss(current, target, weight)
}

/// 콘텐츠 손실: 활성값 MSE 합 x content_weight / 콘텐츠 레이어 수
pub fn content_loss(current: &LayerMap, target: &LayerMap, weight: f32) -> Result<Tensor> {
    layered_loss(current, target, weight)
}

/// 이웃 픽셀 차분 제곱의 평균 (가로 + 세로). 가중치는 곱하지 않는다.
///
/// 폭(높이)이 1인 이미지는 가로(세로) 항이 0이다.
pub fn total_variation_loss(image: &Tensor) -> Result<Tensor> {
    let (_, h, w, _) = image.dims4()?;
    let zero = Tensor::zeros((), image.dtype(), image.device())?;

    let x_term = if w > 1 {
        let x_deltas = image.narrow(2, 1, w - 1)?.sub(&image.narrow(2, 0, w - 1)?)?;
        x_deltas.sqr()?.mean_all()?
    } else {
        zero.clone()
    };
    let y_term = if h > 1 {
        let y_deltas = image.narrow(1, 1, h - 1)?.sub(&image.narrow(1, 0, h - 1)?)?;
        y_deltas.sqr()?.mean_all()?
    } else {
        zero
    };

    Ok((x_term + y_term)?)
}

/// 스타일 + 콘텐츠 + 전변동 정규화 손실 합성기
#[derive(Debug, Clone, Copy, Default)]
pub struct LossComposer {
    pub weights: LossWeights,
}

impl LossComposer {
    pub fn new(weights: LossWeights) -> Self {
        Self { weights }
    }

    /// 현재 출력, 타깃, 현재 이미지로 최종 손실 계산.
    /// `current`는 반드시 `image`를 평가한 결과여야 한다.
    pub fn compose(&self, current: &StyleContentOutput, targets: &TargetBundle, image: &Tensor) -> Result<ComposedLoss> {
        let style = style_loss(&current.style, targets.style(), self.weights.style)?;
        let content = content_loss(&current.content, targets.content(), self.weights.content)?;
        let total_variation = (total_variation_loss(image)? * self.weights.total_variation as f64)?;

        let total = style.add(&content)?.add(&total_variation)?;
        Ok(ComposedLoss {
            style,
            content,
            total_variation,
            total,
        })
    }
}
