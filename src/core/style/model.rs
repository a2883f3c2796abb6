//! 스타일-콘텐츠 모델과 타깃 번들

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use candle_core::Tensor;

use super::gram::gram_matrix;
use crate::core::error::{Result, StyleError};
use crate::core::extractor::FeatureExtractor;

/// 레이어 이름 -> 텐서
pub type LayerMap = BTreeMap<String, Tensor>;

/// 한 번의 평가 결과: 콘텐츠 활성값과 스타일 통계
#[derive(Debug, Clone)]
pub struct StyleContentOutput {
    pub content: LayerMap,
    pub style: LayerMap,
}

/// 특징 추출기 + Gram 통계를 묶은 모델
#[derive(Clone)]
pub struct StyleContentModel {
    extractor: Arc<dyn FeatureExtractor>,
    style_layers: Vec<String>,
    content_layers: Vec<String>,
    // 추출기 요청 순서: 스타일 레이어 먼저, 콘텐츠 레이어 다음
    requested: Vec<String>,
}

impl std::fmt::Debug for StyleContentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleContentModel")
            .field("style_layers", &self.style_layers)
            .field("content_layers", &self.content_layers)
            .finish()
    }
}

impl StyleContentModel {
    /// 레이어 이름을 검증하고 모델 생성
    pub fn new(
        extractor: Arc<dyn FeatureExtractor>,
        style_layers: Vec<String>,
        content_layers: Vec<String>,
    ) -> Result<Self> {
        if style_layers.is_empty() || content_layers.is_empty() {
            return Err(StyleError::InvalidConfig(
                "스타일/콘텐츠 레이어가 하나 이상 필요함".to_string(),
            ));
        }

        for (kind, layers) in [("스타일", &style_layers), ("콘텐츠", &content_layers)] {
            let mut seen = HashSet::new();
            for name in layers.iter() {
                if !extractor.has_layer(name) {
                    return Err(StyleError::InvalidLayerName(name.clone()));
                }
                if !seen.insert(name) {
                    return Err(StyleError::InvalidConfig(format!(
                        "{} 레이어 중복: {}",
                        kind, name
                    )));
                }
            }
        }

        let requested = style_layers.iter().chain(content_layers.iter()).cloned().collect();

        Ok(Self {
            extractor,
            style_layers,
            content_layers,
            requested,
        })
    }

    pub fn style_layers(&self) -> &[String] {
        &self.style_layers
    }

    pub fn content_layers(&self) -> &[String] {
        &self.content_layers
    }

    /// 이미지 평가. 출력은 개수 기준으로 나눈다: 앞의 `style_layers.len()`개가 스타일.
    pub fn evaluate(&self, image: &Tensor) -> Result<StyleContentOutput> {
        let mut outputs = self.extractor.extract(image, &self.requested)?;
        let content_outputs = outputs.split_off(self.style_layers.len());

        let style = self
            .style_layers
            .iter()
            .zip(outputs.iter())
            .map(|(name, activation)| Ok((name.clone(), gram_matrix(activation)?)))
            .collect::<Result<LayerMap>>()?;

        let content = self
            .content_layers
            .iter()
            .cloned()
            .zip(content_outputs)
            .collect();

        Ok(StyleContentOutput { content, style })
    }
}

/// 최적화 전에 한 번 계산되어 실행 내내 변하지 않는 타깃 통계
#[derive(Debug, Clone)]
pub struct TargetBundle {
    content: LayerMap,
    style: LayerMap,
}

impl TargetBundle {
    /// 콘텐츠 이미지의 콘텐츠 활성값 + 스타일 이미지의 Gram 통계
    pub fn compute(model: &StyleContentModel, content_image: &Tensor, style_image: &Tensor) -> Result<Self> {
        let style = model.evaluate(style_image)?.style;
        let content = model.evaluate(content_image)?.content;
        log::info!(
            "타깃 통계 계산 완료: 스타일 {}개, 콘텐츠 {}개",
            style.len(),
            content.len()
        );
        Ok(Self { content, style })
    }

    /// 이미 계산된 출력으로부터 생성
    pub fn from_parts(content: LayerMap, style: LayerMap) -> Self {
        Self { content, style }
    }

    pub fn content(&self) -> &LayerMap {
        &self.content
    }

    pub fn style(&self) -> &LayerMap {
        &self.style
    }
}
