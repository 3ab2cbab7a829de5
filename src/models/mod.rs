//! # 数据模型模块
//!
//! 定义光子能谱、透射率与能谱对比的数据模型。
//!
//! ## 依赖关系
//! - 被 `xray/`, `parsers/` 和 `commands/` 使用
//! - 子模块: spectrum, comparison

pub mod comparison;
pub mod spectrum;

pub use comparison::SpectrumComparison;
pub use spectrum::{
    EnergySpectrum, ReconstructedSpectrum, SpectrumPoint, SpectrumValue, TransmissionSample,
    MAX_ENERGY_KEV, MIN_ENERGY_KEV,
};
