//! 테스트 공용 도우미: 시드 고정 합성 이미지와 얕은 네트워크

use std::sync::Arc;

use candle_core::{Device, Tensor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::extractor::{Preprocessing, Vgg19};
use crate::core::style::StyleContentModel;

pub const SHALLOW_STYLE_LAYERS: [&str; 2] = ["block1_conv1", "block2_conv1"];
pub const SHALLOW_CONTENT_LAYERS: [&str; 1] = ["block2_conv2"];

/// 부드러운 그라디언트 + 잡음 패턴의 (1,H,W,3) 이미지
pub fn synthetic_image(height: usize, width: usize, seed: u64) -> Tensor {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(height * width * 3);
    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                let base = (x as f32 / width as f32 + y as f32 / height as f32 + c as f32 * 0.3) / 2.6;
                let noise: f32 = rng.gen_range(-0.15..0.15);
                data.push((base + noise).clamp(0.0, 1.0));
            }
        }
    }
    Tensor::from_vec(data, (1, height, width, 3), &Device::Cpu).unwrap()
}

/// 고주파 체커보드 (1,H,W,3) 이미지. 전변동 항이 크고 최적점이 멀다.
pub fn checkerboard_image(height: usize, width: usize) -> Tensor {
    let mut data = Vec::with_capacity(height * width * 3);
    for y in 0..height {
        for x in 0..width {
            let v = if (x + y) % 2 == 0 { 0.15 } else { 0.85 };
            for c in 0..3 {
                data.push(v + c as f32 * 0.02);
            }
        }
    }
    Tensor::from_vec(data, (1, height, width, 3), &Device::Cpu).unwrap()
}

/// block2_conv2까지만 구성된 무작위 가중치 VGG19
pub fn shallow_vgg(seed: u64) -> Arc<Vgg19> {
    Arc::new(
        Vgg19::with_random_weights(seed, Preprocessing::Torch, Some("block2_conv2"), &Device::Cpu).unwrap(),
    )
}

pub fn shallow_model(seed: u64) -> StyleContentModel {
    StyleContentModel::new(
        shallow_vgg(seed),
        SHALLOW_STYLE_LAYERS.iter().map(|s| s.to_string()).collect(),
        SHALLOW_CONTENT_LAYERS.iter().map(|s| s.to_string()).collect(),
    )
    .unwrap()
}

pub fn to_vec(t: &Tensor) -> Vec<f32> {
    t.flatten_all().unwrap().to_vec1::<f32>().unwrap()
}
