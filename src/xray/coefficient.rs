//! # 质量衰减系数
//!
//! 空气对 X 射线的能量相关衰减系数，来自 NIST 衰减数据的幂律拟合：
//! μ(E) = 393.265 / (E^2.89148 + 0.0990357) + 0.0449311
//!
//! ## 依赖关系
//! - 被 `xray/model.rs` 调用
//! - 纯函数，无外部依赖

use crate::error::{Result, XattenError};

const FIT_SCALE: f64 = 393.265;
const FIT_POWER: f64 = 2.89148;
const FIT_OFFSET: f64 = 0.0990357;
const FIT_FLOOR: f64 = 0.0449311;

/// 计算光子能量 `energy_kev` 下的衰减系数
pub fn attenuation_coefficient(energy_kev: f64) -> Result<f64> {
    if !energy_kev.is_finite() || energy_kev <= 0.0 {
        return Err(XattenError::NonPositiveEnergy(energy_kev));
    }
    Ok(FIT_SCALE / (energy_kev.powf(FIT_POWER) + FIT_OFFSET) + FIT_FLOOR)
}
