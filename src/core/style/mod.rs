//! Gram 통계와 스타일-콘텐츠 모델

pub mod gram;
pub mod model;
pub mod stats;

pub use gram::gram_matrix;
pub use model::{LayerMap, StyleContentModel, StyleContentOutput, TargetBundle};
pub use stats::{log_summary, summarize, LayerStats};

#[cfg(test)]
mod __tests__;
