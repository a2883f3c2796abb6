//! 스타일 전이 전 과정에서 사용하는 오류 타입
//!
//! 모든 오류는 치명적이며 재시도 없이 실행을 중단한다.

use thiserror::Error;

/// 라이브러리 전체에서 사용하는 Result 별칭
pub type Result<T> = std::result::Result<T, StyleError>;

#[derive(Error, Debug)]
pub enum StyleError {
    /// 콘텐츠/스타일 이미지를 찾을 수 없거나 읽을 수 없음
    #[error("잘못된 입력 '{locator}': {reason}")]
    InvalidInput { locator: String, reason: String },

    /// 고정된 특징 추출기에 존재하지 않는 레이어 이름
    #[error("존재하지 않는 레이어: {0}")]
    InvalidLayerName(String),

    /// 손실 또는 그래디언트가 유한하지 않음
    #[error("수치 발산 (스텝 {step}): {quantity} 값이 유한하지 않음")]
    NumericDivergence { step: usize, quantity: &'static str },

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    /// 가중치 파일에 필요한 텐서가 없음
    #[error("잘못된 가중치 파일: {0}")]
    InvalidWeights(String),

    /// 최적화 루프의 상태와 맞지 않는 호출
    #[error("잘못된 상태: {0}")]
    InvalidState(String),

    #[error("텐서 연산 오류: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 오류: {0}")]
    Json(#[from] serde_json::Error),
}

impl StyleError {
    pub fn invalid_input(locator: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidInput {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }
}
