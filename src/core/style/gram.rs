use candle_core::Tensor;

use crate::core::error::{Result, StyleError};

/// 채널 상관 행렬 (Gram matrix)
///
/// (1,H,W,C) 활성값 -> (1,C,C). 모든 공간 위치에 대한 채널 쌍 곱의 합을
/// 위치 수 H*W로 나눈다.
pub fn gram_matrix(activation: &Tensor) -> Result<Tensor> {
    let (b, h, w, c) = activation.dims4()?;
    if b != 1 {
        return Err(StyleError::invalid_input(
            "activation",
            format!("배치 크기는 1이어야 함: {}", b),
        ));
    }

    let locations = h * w;
    let features = activation.reshape((1, locations, c))?;
    let gram = features.t()?.contiguous()?.matmul(&features)?;
    Ok((gram / locations as f64)?)
}
