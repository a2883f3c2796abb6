use std::path::Path;

use candle_core::{Device, Tensor};
use image::imageops::FilterType;
use image::{ImageReader, RgbImage};

use crate::core::error::{Result, StyleError};

/// 긴 변이 `max_dim`이 되도록 하는 크기. 비율 유지, 소수점 이하 버림, 최소 1.
pub fn scaled_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let long_side = width.max(height).max(1) as u64;
    let scale = |side: u32| ((side as u64 * max_dim as u64 / long_side) as u32).max(1);
    (scale(width), scale(height))
}

/// RGB8 이미지 -> (1,H,W,3) [0,1] 텐서
pub fn rgb_to_tensor(image: &RgbImage, device: &Device) -> Result<Tensor> {
    let (w, h) = image.dimensions();
    let data: Vec<f32> = image.as_raw().iter().map(|&p| p as f32 / 255.0).collect();
    Ok(Tensor::from_vec(data, (1, h as usize, w as usize, 3), device)?)
}

/// 이미지 파일을 디코딩하고 (형식은 파일 내용으로 판별) 긴 변 기준으로 리사이즈 (bilinear)
pub fn load_image(path: &Path, max_dim: u32, device: &Device) -> Result<Tensor> {
    let locator = path.display().to_string();
    if !path.is_file() {
        return Err(StyleError::invalid_input(locator, "파일이 없음"));
    }

    // 형식은 확장자가 아닌 파일 내용으로 판별 (캐시 파일 확장자는 URL에서 옴)
    let decoded = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| StyleError::invalid_input(&locator, e))?
        .decode()
        .map_err(|e| StyleError::invalid_input(&locator, e))?;
    let (w, h) = scaled_dimensions(decoded.width(), decoded.height(), max_dim);
    let resized = decoded.resize_exact(w, h, FilterType::Triangle).to_rgb8();

    log::info!(
        "이미지 로드: {} ({}x{} -> {}x{})",
        locator,
        decoded.width(),
        decoded.height(),
        w,
        h
    );
    rgb_to_tensor(&resized, device)
}
