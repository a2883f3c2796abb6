//! 사전학습 네트워크의 입력 규약으로 변환

use candle_core::{Tensor, D};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

const TORCH_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const TORCH_STD: [f32; 3] = [0.229, 0.224, 0.225];
const CAFFE_BGR_MEAN: [f32; 3] = [103.939, 116.779, 123.68];

/// 가중치가 학습될 때 사용된 픽셀 전처리 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preprocessing {
    /// torchvision/timm: RGB, 채널별 평균/표준편차 정규화
    #[default]
    Torch,
    /// Keras/Caffe: BGR, 평균만 빼기
    Caffe,
}

impl std::str::FromStr for Preprocessing {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "torch" => Ok(Self::Torch),
            "caffe" => Ok(Self::Caffe),
            other => Err(format!("알 수 없는 전처리 방식: {}", other)),
        }
    }
}

impl Preprocessing {
    /// [0,1] 범위 (1,H,W,3) 이미지를 0-255로 스케일한 뒤 채널 정규화
    pub fn apply(&self, image: &Tensor) -> Result<Tensor> {
        let device = image.device();
        let scaled = (image * 255.0)?;

        let out = match self {
            Self::Torch => {
                let mean = Tensor::new(&TORCH_MEAN.map(|m| m * 255.0), device)?.reshape((1, 1, 1, 3))?;
                let std = Tensor::new(&TORCH_STD.map(|s| s * 255.0), device)?.reshape((1, 1, 1, 3))?;
                scaled.broadcast_sub(&mean)?.broadcast_div(&std)?
            }
            Self::Caffe => {
                let bgr = Tensor::cat(
                    &[
                        scaled.narrow(D::Minus1, 2, 1)?,
                        scaled.narrow(D::Minus1, 1, 1)?,
                        scaled.narrow(D::Minus1, 0, 1)?,
                    ],
                    3,
                )?;
                let mean = Tensor::new(&CAFFE_BGR_MEAN, device)?.reshape((1, 1, 1, 3))?;
                bgr.broadcast_sub(&mean)?
            }
        };
        Ok(out)
    }
}
