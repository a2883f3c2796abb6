use std::collections::HashMap;
use std::sync::Arc;

use candle_core::{DType, Device, Tensor};

use crate::core::error::StyleError;
use crate::core::extractor::{check_weights, vgg19_layers, FeatureExtractor, Preprocessing, Vgg19, WeightsDownloader};
use crate::core::test_support::synthetic_image;

/// block1 합성곱 두 개 분량의 가중치 파일 작성
fn write_block1_weights(path: &std::path::Path) {
    let device = Device::Cpu;
    let mut tensors = HashMap::new();
    tensors.insert("features.0.weight".to_string(), Tensor::ones((64, 3, 3, 3), DType::F32, &device).unwrap());
    tensors.insert("features.0.bias".to_string(), Tensor::zeros(64, DType::F32, &device).unwrap());
    tensors.insert(
        "features.2.weight".to_string(),
        (Tensor::ones((64, 64, 3, 3), DType::F32, &device).unwrap() * 0.01).unwrap(),
    );
    tensors.insert("features.2.bias".to_string(), Tensor::zeros(64, DType::F32, &device).unwrap());
    candle_core::safetensors::save(&tensors, path).unwrap();
}

#[test]
fn 가중치_파일_검사_테스트() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vgg.safetensors");
    write_block1_weights(&path);

    let layers = vgg19_layers();
    assert!(check_weights(&path, &layers[..3]).is_ok());

    match check_weights(&path, &layers[..4]) {
        Err(StyleError::InvalidWeights(msg)) => assert!(msg.contains("features.5.weight")),
        other => panic!("InvalidWeights 기대: {:?}", other),
    }

    println!("✅ 가중치 파일 검사 테스트 통과");
}

#[test]
fn safetensors_로드_후_추출_테스트() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vgg.safetensors");
    write_block1_weights(&path);

    let vgg = Vgg19::load(&path, Preprocessing::Torch, Some("block1_pool"), &Device::Cpu).unwrap();
    assert_eq!(vgg.depth(), 3);

    let image = synthetic_image(8, 6, 9);
    let out = vgg.extract(&image, &["block1_pool".to_string()]).unwrap();
    assert_eq!(out[0].dims(), &[1, 4, 3, 64]);

    // 더 깊은 레이어를 요구하면 로드 전에 실패
    assert!(matches!(
        Vgg19::load(&path, Preprocessing::Torch, Some("block2_conv1"), &Device::Cpu),
        Err(StyleError::InvalidWeights(_))
    ));
}

#[test]
fn 손상된_가중치_파일_테스트() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.safetensors");
    std::fs::write(&path, b"not a safetensors file").unwrap();

    assert!(matches!(
        check_weights(&path, &vgg19_layers()[..1]),
        Err(StyleError::InvalidWeights(_))
    ));
}

#[test]
fn 공유_네트워크_절단_로드_테스트() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("block1.safetensors");
    write_block1_weights(&path);

    // 파일에 block1만 있어도 필요한 깊이까지만 로드하면 성공
    let shared = Vgg19::shared(&path, Preprocessing::Torch, Some("block1_pool"), &Device::Cpu).unwrap();
    assert_eq!(shared.depth(), 3);
    assert!(shared.has_layer("block1_conv2"));
    assert!(!shared.has_layer("block2_conv1"));

    // 이후 호출은 인자와 무관하게 첫 인스턴스
    let again = Vgg19::shared(&dir.path().join("missing.safetensors"), Preprocessing::Caffe, None, &Device::Cpu).unwrap();
    assert!(Arc::ptr_eq(&shared, &again));
    assert_eq!(again.preprocessing(), Preprocessing::Torch);

    println!("✅ 공유 네트워크 절단 로드 테스트 통과");
}

#[test]
fn 허브_오류는_가중치_오류_테스트() {
    let downloader = WeightsDownloader::new("someone/vgg19");
    match downloader.hub_error("request error: 404") {
        StyleError::InvalidWeights(msg) => {
            assert!(msg.contains("someone/vgg19/model.safetensors"));
            assert!(msg.contains("404"));
        }
        other => panic!("InvalidWeights 기대: {:?}", other),
    }
}

/// 네트워크가 필요하다
#[tokio::test]
#[ignore]
async fn 없는_저장소_다운로드_실패_테스트() {
    let downloader = WeightsDownloader::new("neural-style-tests/no-such-vgg19-repo");
    assert!(matches!(downloader.download().await, Err(StyleError::InvalidWeights(_))));
}
