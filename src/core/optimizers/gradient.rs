//! 손실의 이미지 변수에 대한 그래디언트 계산
//!
//! 최적화 루프는 어떤 미분 방식을 쓰는지 모른다. 역전파 자동미분과
//! 검증용 중앙 차분 두 가지 구현을 제공한다.

use candle_core::{Tensor, Var};

use crate::core::error::{Result, StyleError};

/// 스칼라 손실을 만드는 함수. 입력은 현재 이미지 텐서.
pub type LossFn<'a> = dyn Fn(&Tensor) -> Result<Tensor> + 'a;

pub trait Differentiator {
    /// 손실 값과 변수에 대한 그래디언트를 함께 계산
    fn value_and_gradient(&self, loss_fn: &LossFn<'_>, variable: &Var) -> Result<(f32, Tensor)>;
}

/// candle 역전파(reverse-mode) 자동미분
#[derive(Debug, Clone, Copy, Default)]
pub struct Backprop;

impl Differentiator for Backprop {
    fn value_and_gradient(&self, loss_fn: &LossFn<'_>, variable: &Var) -> Result<(f32, Tensor)> {
        let loss = loss_fn(variable.as_tensor())?;
        let value = scalar_value(&loss)?;

        let grads = loss.backward()?;
        let gradient = match grads.get(variable.as_tensor()) {
            Some(g) => g.detach(),
            // 손실이 변수와 무관하면 그래디언트는 0
            None => variable.as_tensor().zeros_like()?,
        };
        Ok((value, gradient))
    }
}

/// 중앙 차분. 원소마다 손실을 두 번 평가하므로 작은 텐서 검증에만 쓴다.
#[derive(Debug, Clone, Copy)]
pub struct FiniteDifference {
    pub epsilon: f32,
}

impl Default for FiniteDifference {
    fn default() -> Self {
        Self { epsilon: 1e-2 }
    }
}

impl Differentiator for FiniteDifference {
    fn value_and_gradient(&self, loss_fn: &LossFn<'_>, variable: &Var) -> Result<(f32, Tensor)> {
        let base = variable.as_tensor();
        let shape = base.shape().clone();
        let device = base.device().clone();
        let values = base.flatten_all()?.to_vec1::<f32>()?;

        let evaluate = |data: Vec<f32>| -> Result<f32> {
            let probe = Tensor::from_vec(data, shape.clone(), &device)?;
            scalar_value(&loss_fn(&probe)?)
        };

        let value = evaluate(values.clone())?;
        let mut gradient = Vec::with_capacity(values.len());
        for i in 0..values.len() {
            let mut plus = values.clone();
            plus[i] += self.epsilon;
            let mut minus = values.clone();
            minus[i] -= self.epsilon;
            let diff = evaluate(plus)? - evaluate(minus)?;
            gradient.push(diff / (2.0 * self.epsilon));
        }

        Ok((value, Tensor::from_vec(gradient, shape, &device)?))
    }
}

fn scalar_value(loss: &Tensor) -> Result<f32> {
    if loss.elem_count() != 1 {
        return Err(StyleError::InvalidState(format!(
            "손실은 스칼라여야 함: {:?}",
            loss.shape()
        )));
    }
    Ok(loss.flatten_all()?.to_vec1::<f32>()?[0])
}
