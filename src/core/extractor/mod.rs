//! 사전학습 VGG19 특징 추출기

pub mod layers;
pub mod preprocess;
pub mod vgg;
pub mod weights;

pub use layers::{layer_position, vgg19_layers, LayerKind, LayerSpec};
pub use preprocess::Preprocessing;
pub use vgg::{depth_through, FeatureExtractor, Vgg19};
pub use weights::{check_weights, WeightsDownloader, DEFAULT_WEIGHTS_REPO};

#[cfg(test)]
mod __tests__;
