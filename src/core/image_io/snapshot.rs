use std::path::{Path, PathBuf};

use candle_core::Tensor;
use image::{ImageFormat, RgbImage};

use crate::core::error::{Result, StyleError};

/// 에폭 스냅샷 파일 이름
pub fn snapshot_file_name(epoch: usize) -> String {
    format!("image_at_epoch{:04}.png", epoch)
}

/// (1,H,W,3) 텐서 -> RGB8 이미지 (클램프 후 반올림)
pub fn tensor_to_rgb(image: &Tensor) -> Result<RgbImage> {
    let (_, h, w, c) = image.dims4()?;
    if c != 3 {
        return Err(StyleError::invalid_input("image tensor", format!("채널 수 3이 아님: {}", c)));
    }

    let pixels: Vec<u8> = image
        .clamp(0f32, 1f32)?
        .flatten_all()?
        .to_vec1::<f32>()?
        .into_iter()
        .map(|v| (v * 255.0).round() as u8)
        .collect();

    RgbImage::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| StyleError::InvalidState("픽셀 버퍼 크기 불일치".to_string()))
}

/// 현재 이미지를 `dir/image_at_epochNNNN.png`로 저장
pub fn save_snapshot(image: &Tensor, dir: &Path, epoch: usize) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(snapshot_file_name(epoch));
    tensor_to_rgb(image)?
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|e| StyleError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
    log::info!("스냅샷 저장: {}", path.display());
    Ok(path)
}
