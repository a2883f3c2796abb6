use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use hf_hub::{api::tokio::Api, Repo, RepoType};
use memmap2::Mmap;
use safetensors::SafeTensors;

use super::layers::LayerSpec;
use crate::core::error::{Result, StyleError};

/// 기본 VGG19 가중치 저장소 (torchvision 학습본)
pub const DEFAULT_WEIGHTS_REPO: &str = "timm/vgg19.tv_in1k";
pub const WEIGHTS_FILE: &str = "model.safetensors";

/// HuggingFace Hub에서 VGG19 가중치를 받아오는 구조체
#[derive(Debug, Clone)]
pub struct WeightsDownloader {
    pub repo_id: String,
    pub filename: String,
}

impl WeightsDownloader {
    pub fn new(repo_id: &str) -> Self {
        Self {
            repo_id: repo_id.to_string(),
            filename: WEIGHTS_FILE.to_string(),
        }
    }

    /// hf-hub 캐시에 내려받고 로컬 경로를 돌려준다 (이미 있으면 재사용)
    pub async fn download(&self) -> Result<PathBuf> {
        log::info!("가중치 다운로드: {}/{}", self.repo_id, self.filename);

        let api = Api::new().map_err(|e| self.hub_error(e))?;
        let repo = api.repo(Repo::new(self.repo_id.clone(), RepoType::Model));
        let path = repo.get(&self.filename).await.map_err(|e| self.hub_error(e))?;

        log::info!("가중치 준비 완료: {}", path.display());
        Ok(path)
    }

    pub(crate) fn hub_error(&self, reason: impl std::fmt::Display) -> StyleError {
        StyleError::InvalidWeights(format!(
            "Hub에서 {}/{} 받기 실패: {}",
            self.repo_id, self.filename, reason
        ))
    }
}

/// safetensors 헤더만 읽어 텐서 이름 목록을 얻는다
pub fn tensor_names(path: &Path) -> Result<HashSet<String>> {
    let file = File::open(path)?;
    // SAFETY: 읽기 전용 매핑이며 매핑이 살아 있는 동안 파일을 수정하지 않는다
    let mmap = unsafe { Mmap::map(&file)? };
    let tensors = SafeTensors::deserialize(&mmap)
        .map_err(|e| StyleError::InvalidWeights(format!("{}: {}", path.display(), e)))?;
    Ok(tensors.names().into_iter().cloned().collect())
}

/// 필요한 합성곱 레이어의 가중치가 모두 있는지 검사
pub fn check_weights(path: &Path, layers: &[LayerSpec]) -> Result<()> {
    let names = tensor_names(path)?;
    for layer in layers.iter().filter(|l| l.is_conv()) {
        for key in [layer.weight_key(), layer.bias_key()] {
            if !names.contains(&key) {
                return Err(StyleError::InvalidWeights(format!(
                    "{}에 '{}' ({}) 없음",
                    path.display(),
                    key,
                    layer.name
                )));
            }
        }
    }
    Ok(())
}
