//! # 标准大气分层模型
//!
//! 基于国际标准大气 (ISA) 分层数据计算给定高度处的空气密度。
//!
//! ## 公式
//! 温度随高度线性变化的层（递减率 L ≠ 0）：
//! ρ = ρb · [Tb / (Tb + L(h − hb))]^(1 + g₀M / (R·L))
//!
//! 等温层（L = 0）：
//! ρ = ρb · exp(−g₀M(h − hb) / (R·Tb))
//!
//! 100 km 以上的哨兵层密度恒为 0。
//!
//! ## 数据来源
//! https://en.wikipedia.org/wiki/Barometric_formula
//!
//! ## 依赖关系
//! - 被 `xray/column.rs` 调用进行柱密度积分
//! - 纯静态数据，无外部依赖

use crate::error::{Result, XattenError};

/// 标准重力加速度 (m/s²)
pub const G0: f64 = 9.80665;

/// 空气摩尔质量 (kg/mol)
pub const MOLAR_MASS_AIR: f64 = 0.0289644;

/// 通用气体常数 (J/(mol·K))
pub const GAS_CONSTANT: f64 = 8.3144598;

/// 模型大气顶（m），此高度及以上密度为 0
pub const TOP_OF_ATMOSPHERE_M: f64 = 100_000.0;

/// 哨兵层索引
pub const SENTINEL_LAYER: usize = 7;

/// 大气分层参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereLayer {
    /// 层底高度 (m)
    pub base_altitude_m: f64,
    /// 层底密度 (kg/m³)
    pub base_density_kg_m3: f64,
    /// 层底温度 (K)
    pub base_temperature_k: f64,
    /// 温度递减率 (K/m)
    pub lapse_rate_k_per_m: f64,
}

impl AtmosphereLayer {
    const fn new(base: f64, density: f64, temperature: f64, lapse: f64) -> Self {
        Self {
            base_altitude_m: base,
            base_density_kg_m3: density,
            base_temperature_k: temperature,
            lapse_rate_k_per_m: lapse,
        }
    }

    /// 是否为等温层
    pub fn is_isothermal(&self) -> bool {
        self.lapse_rate_k_per_m == 0.0
    }

    /// 在本层内计算高度 `altitude` 处的密度
    fn density_at(&self, altitude: f64) -> f64 {
        let dh = altitude - self.base_altitude_m;
        let t = self.base_temperature_k;

        if !self.is_isothermal() {
            let l = self.lapse_rate_k_per_m;
            let base = t / (t + l * dh);
            let exponent = 1.0 + (G0 * MOLAR_MASS_AIR) / (GAS_CONSTANT * l);
            self.base_density_kg_m3 * base.powf(exponent)
        } else {
            let exponent = (-G0 * MOLAR_MASS_AIR * dh) / (GAS_CONSTANT * t);
            self.base_density_kg_m3 * exponent.exp()
        }
    }
}

/// ISA 分层表：7 个物理层 + 1 个 100 km 以上的哨兵层
///
/// 层底高度严格递增。
pub const ATMOSPHERE: [AtmosphereLayer; 8] = [
    AtmosphereLayer::new(0.0, 1.225000, 288.15, -0.0065),
    AtmosphereLayer::new(11000.0, 0.363910, 216.65, 0.0),
    AtmosphereLayer::new(20000.0, 0.088030, 216.65, 0.0010),
    AtmosphereLayer::new(32000.0, 0.013220, 228.65, 0.0028),
    AtmosphereLayer::new(47000.0, 0.001430, 270.65, 0.0),
    AtmosphereLayer::new(51000.0, 0.000860, 270.65, -0.0028),
    AtmosphereLayer::new(71000.0, 0.000064, 214.65, -0.0020),
    AtmosphereLayer::new(TOP_OF_ATMOSPHERE_M, 0.0, 1.0, -1.0),
];

/// 检查高度是否在定义域内（有限且 >= 0）
pub fn check_altitude(altitude_m: f64) -> Result<()> {
    if !altitude_m.is_finite() || altitude_m < 0.0 {
        return Err(XattenError::NegativeAltitude(altitude_m));
    }
    Ok(())
}

/// 查找包含给定高度的层索引
///
/// 返回最后一个层底高度 <= `altitude_m` 的层；恰好落在层底的高度属于该层。
/// 100 km 及以上返回哨兵层 7。
pub fn resolve_layer(altitude_m: f64) -> Result<usize> {
    check_altitude(altitude_m)?;
    Ok(layer_index(altitude_m))
}

/// 计算高度处的空气密度 (kg/m³)
pub fn density(altitude_m: f64) -> Result<f64> {
    check_altitude(altitude_m)?;
    Ok(density_unchecked(altitude_m))
}

/// 层查找（调用方保证高度非负）
fn layer_index(altitude_m: f64) -> usize {
    if altitude_m >= TOP_OF_ATMOSPHERE_M {
        return SENTINEL_LAYER;
    }
    ATMOSPHERE
        .iter()
        .rposition(|layer| layer.base_altitude_m <= altitude_m)
        .unwrap_or(0)
}

/// 密度计算热路径，由积分器在校验区间后直接调用
pub(crate) fn density_unchecked(altitude_m: f64) -> f64 {
    let layer = layer_index(altitude_m);
    if layer == SENTINEL_LAYER {
        return 0.0;
    }
    ATMOSPHERE[layer].density_at(altitude_m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, rel: f64) {
        let scale = expected.abs().max(1e-300);
        assert!(
            ((actual - expected) / scale).abs() < rel,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_table_strictly_increasing() {
        for pair in ATMOSPHERE.windows(2) {
            assert!(pair[0].base_altitude_m < pair[1].base_altitude_m);
        }
    }

    #[test]
    fn test_resolve_layer_boundaries() {
        assert_eq!(resolve_layer(0.0).unwrap(), 0);
        assert_eq!(resolve_layer(10999.9).unwrap(), 0);
        // 层底高度归属上层
        assert_eq!(resolve_layer(11000.0).unwrap(), 1);
        assert_eq!(resolve_layer(20000.0).unwrap(), 2);
        assert_eq!(resolve_layer(46999.0).unwrap(), 3);
        assert_eq!(resolve_layer(71000.0).unwrap(), 6);
        assert_eq!(resolve_layer(99999.0).unwrap(), 6);
        assert_eq!(resolve_layer(100000.0).unwrap(), SENTINEL_LAYER);
        assert_eq!(resolve_layer(2.5e6).unwrap(), SENTINEL_LAYER);
    }

    #[test]
    fn test_negative_altitude_rejected() {
        assert!(matches!(
            resolve_layer(-1.0),
            Err(XattenError::NegativeAltitude(_))
        ));
        assert!(density(-0.5).is_err());
        assert!(density(f64::NAN).is_err());
    }

    #[test]
    fn test_sea_level_density() {
        assert_eq!(density(0.0).unwrap(), 1.225);
    }

    #[test]
    fn test_reference_densities() {
        assert_close(density(5000.0).unwrap(), 0.73612364740266989, 1e-12);
        assert_close(density(15000.0).unwrap(), 0.19367152167419316, 1e-12);
        assert_close(density(90000.0).unwrap(), 2.788840747954344e-06, 1e-10);
        assert_close(density(99999.0).unwrap(), 4.0395963722332233e-07, 1e-10);
    }

    #[test]
    fn test_zero_above_top() {
        for h in [100000.0, 100000.5, 150000.0, 1.0e7] {
            assert_eq!(density(h).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_continuity_at_layer_boundaries() {
        for layer in &ATMOSPHERE[1..SENTINEL_LAYER] {
            let b = layer.base_altitude_m;
            let below = density(b - 1e-6).unwrap();
            let above = density(b).unwrap();
            assert!(
                ((below - above) / above).abs() < 0.01,
                "discontinuity at {} m: {} vs {}",
                b,
                below,
                above
            );
        }
    }

    #[test]
    fn test_density_decreases_with_altitude() {
        let mut prev = density(0.0).unwrap();
        for h in (500..100_000).step_by(500) {
            let d = density(h as f64).unwrap();
            assert!(d < prev, "density not decreasing at {} m", h);
            prev = d;
        }
    }
}
