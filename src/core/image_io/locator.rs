use std::path::{Path, PathBuf};

use crate::core::error::{Result, StyleError};

/// 이미지 위치: 로컬 경로 또는 내려받을 URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLocator {
    Local(PathBuf),
    Remote(String),
}

impl ImageLocator {
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Remote(s.to_string())
        } else {
            Self::Local(PathBuf::from(s))
        }
    }

    /// 원격이면 `cache_dir/<name>.<ext>`로 캐시하고 출처 URL을 `<name>.<ext>.url`에 기록한다.
    /// 캐시 파일은 같은 URL에서 받은 경우에만 재사용한다.
    pub async fn resolve(&self, cache_dir: &Path, name: &str) -> Result<PathBuf> {
        match self {
            Self::Local(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(StyleError::invalid_input(path.display().to_string(), "파일이 없음"))
                }
            }
            Self::Remote(url) => {
                let file_name = format!("{}.{}", name, url_extension(url));
                let target = cache_dir.join(&file_name);
                let marker = cache_dir.join(format!("{}.url", file_name));

                if target.is_file() {
                    match tokio::fs::read_to_string(&marker).await {
                        Ok(source) if source.trim() == url.as_str() => {
                            log::info!("캐시된 이미지 사용: {}", target.display());
                            return Ok(target);
                        }
                        Ok(source) => {
                            log::warn!(
                                "캐시 {}의 출처가 다름 ({} != {}), 다시 받는다",
                                target.display(),
                                source.trim(),
                                url
                            );
                        }
                        Err(_) => {
                            log::warn!("출처 기록 없는 캐시 이미지 재사용: {}", target.display());
                            return Ok(target);
                        }
                    }
                }

                tokio::fs::create_dir_all(cache_dir).await?;
                download_file(url, &target).await?;
                tokio::fs::write(&marker, url.as_bytes()).await?;
                Ok(target)
            }
        }
    }
}

impl std::fmt::Display for ImageLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// URL 마지막 경로 조각의 확장자 (없으면 jpg)
pub(crate) fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "jpg".to_string())
}

/// 실제 파일 다운로드
async fn download_file(url: &str, path: &Path) -> Result<()> {
    log::info!("다운로드 시도 중: {}", url);

    let client = reqwest::Client::builder()
        .user_agent("neural-style/0.1")
        .timeout(std::time::Duration::from_secs(300))
        .build()
        .map_err(|e| StyleError::invalid_input(url, e))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| StyleError::invalid_input(url, e))?;

    if !response.status().is_success() {
        return Err(StyleError::invalid_input(
            url,
            format!("다운로드 실패: {}", response.status()),
        ));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| StyleError::invalid_input(url, e))?;
    log::info!("다운로드 완료: {} bytes", bytes.len());
    tokio::fs::write(path, bytes).await?;

    Ok(())
}
