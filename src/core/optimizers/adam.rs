use candle_core::Tensor;

use super::config::AdamConfig;
use crate::core::error::Result;

/// 텐서 단위 Adam 최적화기 상태
///
/// 모멘트는 첫 업데이트 때 파라미터 형상으로 생성되며 실행 인스턴스 밖으로 나가지 않는다.
#[derive(Debug, Clone)]
pub struct AdamState {
    m: Option<Tensor>, // 1차 모멘트
    v: Option<Tensor>, // 2차 모멘트
    t: i32,            // 시간 스텝
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
}

impl Default for AdamState {
    fn default() -> Self {
        Self::with_config(&AdamConfig::default())
    }
}

impl AdamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &AdamConfig) -> Self {
        Self {
            m: None,
            v: None,
            t: 0,
            beta1: config.beta1,
            beta2: config.beta2,
            epsilon: config.epsilon,
        }
    }

    /// Adam 업데이트 수행. 갱신된 파라미터를 새 텐서로 돌려준다.
    pub fn update(&mut self, param: &Tensor, gradient: &Tensor, learning_rate: f32) -> Result<Tensor> {
        self.t += 1;
        let b1 = self.beta1 as f64;
        let b2 = self.beta2 as f64;

        // 모멘텀 업데이트
        let m = match &self.m {
            Some(m) => ((m * b1)? + (gradient * (1.0 - b1))?)?,
            None => (gradient * (1.0 - b1))?,
        };
        let g2 = gradient.sqr()?;
        let v = match &self.v {
            Some(v) => ((v * b2)? + (g2 * (1.0 - b2))?)?,
            None => (g2 * (1.0 - b2))?,
        };

        // 편향 보정
        let m_hat = (&m / (1.0 - b1.powi(self.t)))?;
        let v_hat = (&v / (1.0 - b2.powi(self.t)))?;

        // 파라미터 업데이트
        let denom = (v_hat.sqrt()? + self.epsilon as f64)?;
        let delta = (m_hat.div(&denom)? * learning_rate as f64)?;
        let updated = param.sub(&delta)?;

        self.m = Some(m);
        self.v = Some(v);
        Ok(updated)
    }

    /// 수행된 업데이트 횟수
    pub fn steps(&self) -> i32 {
        self.t
    }

    /// 상태 초기화
    pub fn reset(&mut self) {
        self.m = None;
        self.v = None;
        self.t = 0;
    }
}
