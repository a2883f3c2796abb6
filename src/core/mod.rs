//! # 스타일 전이 핵심 모듈
//!
//! 특징 추출 -> Gram 통계 -> 손실 합성 -> 픽셀 최적화 루프

pub mod config;
pub mod error;
pub mod extractor;
pub mod image_io;
pub mod loss;
pub mod optimizers;
pub mod style;

#[cfg(test)]
pub(crate) mod test_support;

// 주요 타입들 재수출
pub use config::*;
pub use error::{Result, StyleError};
pub use extractor::*;
pub use image_io::*;
pub use loss::*;
pub use optimizers::*;
pub use style::*;
