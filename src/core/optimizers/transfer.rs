//! 이미지 픽셀을 직접 최적화하는 스타일 전이 루프
//!
//! 상태: Uninitialized -> Stepping -> Exhausted.
//! 종료 조건은 스텝 예산뿐이며 조기 종료나 손실 기반 종료는 없다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use candle_core::{Tensor, Var};

use super::adam::AdamState;
use super::config::OptimizerConfig;
use super::gradient::{Backprop, Differentiator};
use crate::core::error::{Result, StyleError};
use crate::core::loss::LossComposer;
use crate::core::style::{StyleContentModel, TargetBundle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    /// 이미지가 아직 시드되지 않음
    Uninitialized,
    /// 스텝 진행 중
    Stepping,
    /// 스텝 예산 소진
    Exhausted,
}

/// 실행 중 관찰자에게 전달되는 이벤트
#[derive(Debug)]
pub enum TransferEvent<'a> {
    Step { step: usize, loss: f32 },
    /// 에폭 종료. 이 시점의 이미지는 스냅샷 대상이다.
    EpochEnd { epoch: usize, image: &'a Tensor },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// 1부터 시작하는 누적 스텝 번호
    pub step: usize,
    /// 업데이트 직전 이미지에서 계산된 손실
    pub loss: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub first_loss: Option<f32>,
    pub last_loss: Option<f32>,
    pub elapsed: Duration,
}

/// 실행 예산
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBudget {
    pub epochs: usize,
    pub steps_per_epoch: usize,
}

impl StepBudget {
    pub fn total(&self) -> usize {
        self.epochs * self.steps_per_epoch
    }
}

pub struct StyleTransfer<G: Differentiator = Backprop> {
    model: StyleContentModel,
    targets: Arc<TargetBundle>,
    composer: LossComposer,
    optimizer: AdamState,
    learning_rate: f32,
    differentiator: G,
    budget: StepBudget,
    image: Option<Var>,
    phase: TransferPhase,
    step: usize,
}

impl StyleTransfer<Backprop> {
    pub fn new(
        model: StyleContentModel,
        targets: Arc<TargetBundle>,
        composer: LossComposer,
        optimizer: &OptimizerConfig,
        budget: StepBudget,
    ) -> Self {
        Self {
            model,
            targets,
            composer,
            optimizer: AdamState::with_config(&optimizer.adam),
            learning_rate: optimizer.learning_rate,
            differentiator: Backprop,
            budget,
            image: None,
            phase: TransferPhase::Uninitialized,
            step: 0,
        }
    }
}

impl<G: Differentiator> StyleTransfer<G> {
    /// 그래디언트 계산 방식 교체
    pub fn with_differentiator<H: Differentiator>(self, differentiator: H) -> StyleTransfer<H> {
        StyleTransfer {
            model: self.model,
            targets: self.targets,
            composer: self.composer,
            optimizer: self.optimizer,
            learning_rate: self.learning_rate,
            differentiator,
            budget: self.budget,
            image: self.image,
            phase: self.phase,
            step: self.step,
        }
    }

    /// 콘텐츠 이미지로 최적화 변수를 시드. 옵티마이저 모멘트와 스텝 카운터도 초기화된다.
    pub fn seed(&mut self, content_image: &Tensor) -> Result<()> {
        let dims = content_image.dims();
        if dims.len() != 4 || dims[0] != 1 || dims[3] != 3 {
            return Err(StyleError::invalid_input(
                "content image",
                format!("(1,H,W,3) 형상이어야 함: {:?}", dims),
            ));
        }

        let seeded = content_image.clamp(0f32, 1f32)?;
        self.image = Some(Var::from_tensor(&seeded)?);
        self.optimizer.reset();
        self.step = 0;
        self.phase = if self.budget.total() == 0 {
            TransferPhase::Exhausted
        } else {
            TransferPhase::Stepping
        };

        log::info!(
            "이미지 시드 완료: {:?}, 예산 {}에폭 x {}스텝",
            dims,
            self.budget.epochs,
            self.budget.steps_per_epoch
        );
        Ok(())
    }

    /// 한 스텝: 평가 -> 손실 -> 그래디언트 -> Adam 업데이트 -> [0,1] 클리핑
    pub fn step(&mut self) -> Result<StepReport> {
        match self.phase {
            TransferPhase::Uninitialized => {
                return Err(StyleError::InvalidState("이미지가 시드되지 않음".to_string()))
            }
            TransferPhase::Exhausted => {
                return Err(StyleError::InvalidState(format!(
                    "스텝 예산 소진: {}",
                    self.budget.total()
                )))
            }
            TransferPhase::Stepping => {}
        }

        let image = self
            .image
            .as_ref()
            .ok_or_else(|| StyleError::InvalidState("이미지 변수 없음".to_string()))?;
        let step = self.step + 1;

        let model = &self.model;
        let composer = &self.composer;
        let targets = self.targets.as_ref();
        let loss_fn = |current: &Tensor| -> Result<Tensor> {
            let outputs = model.evaluate(current)?;
            Ok(composer.compose(&outputs, targets, current)?.total)
        };
        let (loss, gradient) = self.differentiator.value_and_gradient(&loss_fn, image)?;

        // 발산은 치명적 오류: 업데이트 전에 중단해 이미지는 마지막 유효 상태로 남는다
        if !loss.is_finite() {
            return Err(StyleError::NumericDivergence { step, quantity: "loss" });
        }
        let grad_mass = gradient.abs()?.sum_all()?.to_scalar::<f32>()?;
        if !grad_mass.is_finite() {
            return Err(StyleError::NumericDivergence { step, quantity: "gradient" });
        }

        let updated = self
            .optimizer
            .update(image.as_tensor(), &gradient, self.learning_rate)?;
        let clipped = updated.clamp(0f32, 1f32)?;
        image.set(&clipped)?;

        self.step = step;
        if self.step >= self.budget.total() {
            self.phase = TransferPhase::Exhausted;
        }

        log::debug!("스텝 {}: loss={:.4}", step, loss);
        Ok(StepReport { step, loss })
    }

    /// 남은 예산을 모두 소진. 스텝마다, 그리고 에폭이 끝날 때마다 관찰자를 호출한다.
    pub fn run<F>(&mut self, mut on_event: F) -> Result<RunSummary>
    where
        F: FnMut(TransferEvent<'_>) -> Result<()>,
    {
        if self.phase == TransferPhase::Uninitialized {
            return Err(StyleError::InvalidState("이미지가 시드되지 않음".to_string()));
        }

        let start = Instant::now();
        let mut first_loss = None;
        let mut last_loss = None;
        let mut steps = 0;

        while self.phase == TransferPhase::Stepping {
            let report = self.step()?;
            first_loss.get_or_insert(report.loss);
            last_loss = Some(report.loss);
            steps += 1;
            on_event(TransferEvent::Step {
                step: report.step,
                loss: report.loss,
            })?;

            if report.step % self.budget.steps_per_epoch == 0 {
                let epoch = report.step / self.budget.steps_per_epoch - 1;
                if let Some(image) = self.image.as_ref() {
                    on_event(TransferEvent::EpochEnd {
                        epoch,
                        image: image.as_tensor(),
                    })?;
                }
                log::info!("에폭 {} 완료 (loss={:.4})", epoch, report.loss);
            }
        }

        Ok(RunSummary {
            steps,
            first_loss,
            last_loss,
            elapsed: start.elapsed(),
        })
    }

    /// 현재 이미지 (시드 전에는 None)
    pub fn image(&self) -> Option<&Tensor> {
        self.image.as_ref().map(|v| v.as_tensor())
    }

    pub fn phase(&self) -> TransferPhase {
        self.phase
    }

    pub fn steps_taken(&self) -> usize {
        self.step
    }

    pub fn budget(&self) -> StepBudget {
        self.budget
    }
}
