pub mod adam;
pub mod config;
pub mod gradient;
pub mod transfer;

pub use adam::AdamState;
pub use config::{AdamConfig, OptimizerConfig};
pub use gradient::{Backprop, Differentiator, FiniteDifference, LossFn};
pub use transfer::{RunSummary, StepBudget, StepReport, StyleTransfer, TransferEvent, TransferPhase};

#[cfg(test)]
mod __tests__;
