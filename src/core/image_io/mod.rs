//! 이미지 로딩/리사이즈와 에폭 스냅샷 저장

pub mod loader;
pub mod locator;
pub mod snapshot;

pub use loader::{load_image, rgb_to_tensor, scaled_dimensions};
pub use locator::ImageLocator;
pub use snapshot::{save_snapshot, snapshot_file_name, tensor_to_rgb};
