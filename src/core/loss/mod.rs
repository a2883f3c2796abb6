//! 스타일/콘텐츠/전변동 손실 합성

pub mod composer;

pub use composer::{
    content_loss, mean_squared_error, style_loss, total_variation_loss, ComposedLoss, LossBreakdown,
    LossComposer, LossWeights,
};
