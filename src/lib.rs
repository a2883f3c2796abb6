//! 신경망 스타일 전이 라이브러리
//!
//! 고정된 VGG19 특징 위에서 콘텐츠/스타일/전변동 손실을 합성하고
//! 이미지 픽셀 자체를 Adam으로 최적화한다.

pub mod core;

// 핵심 모듈들 재수출
pub use core::{
    // 설정 및 오류
    Result, StyleError, TransferConfig,
    // 특징 추출
    FeatureExtractor, Preprocessing, Vgg19,
    // 스타일 통계와 손실
    gram_matrix, LossComposer, LossWeights, StyleContentModel, TargetBundle,
    // 최적화 루프
    AdamState, Backprop, Differentiator, FiniteDifference, StyleTransfer, TransferEvent, TransferPhase,
    // 이미지 입출력
    load_image, save_snapshot, ImageLocator,
};
