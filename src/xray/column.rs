//! # 柱密度积分器
//!
//! 用定步长梯形法对密度剖面积分，得到高度区间内的柱密度（kg/m²）。
//! 结果是高度-密度曲线下的面积，不除以区间长度。
//!
//! ## 算法
//! 对 i = start, start + step, ... 直到 i >= end + step 为止，累加
//! ((ρ(i) + ρ(i + step)) / 2) · step。
//! 区间末尾因此包含一个补齐步长；零宽区间恰好得到一个梯形。
//!
//! 起点高于 100 km 时直接返回 0；模型大气顶以上的网格点贡献为 0，不再求值。
//!
//! ## 依赖关系
//! - 被 `xray/model.rs` 调用
//! - 使用 `xray/atmosphere.rs` 计算密度

use crate::error::{Result, XattenError};
use crate::xray::atmosphere::{self, TOP_OF_ATMOSPHERE_M};

/// 默认积分步长 (m)
pub const DEFAULT_STEP_M: i64 = 10;

/// 梯形法柱密度积分器
#[derive(Debug, Clone, Copy)]
pub struct ColumnIntegrator {
    /// 积分步长 (m)
    step_m: i64,
}

impl Default for ColumnIntegrator {
    fn default() -> Self {
        Self {
            step_m: DEFAULT_STEP_M,
        }
    }
}

impl ColumnIntegrator {
    /// 创建指定步长的积分器
    pub fn new(step_m: i64) -> Result<Self> {
        if step_m <= 0 {
            return Err(XattenError::InvalidStep(step_m));
        }
        Ok(Self { step_m })
    }

    /// 积分步长 (m)
    pub fn step_m(&self) -> i64 {
        self.step_m
    }

    /// 计算 [start, end] 区间的柱密度
    pub fn column_density(&self, start_altitude_m: i64, end_altitude_m: i64) -> Result<f64> {
        check_interval(start_altitude_m, end_altitude_m)?;

        if start_altitude_m as f64 > TOP_OF_ATMOSPHERE_M {
            return Ok(0.0);
        }

        // 大气顶以上的网格点贡献为 0，截断终点不改变结果
        let end = end_altitude_m.min(TOP_OF_ATMOSPHERE_M as i64);
        let step = self.step_m;
        let span = end - start_altitude_m;
        let n_steps = span / step + i64::from(span % step != 0) + 1;
        let step_len = step as f64;

        let mut area = 0.0;
        for k in 0..n_steps {
            let lower = match k.checked_mul(step).and_then(|d| start_altitude_m.checked_add(d)) {
                Some(h) if (h as f64) < TOP_OF_ATMOSPHERE_M => h,
                _ => break,
            };
            let upper = lower.saturating_add(step);
            let rho_lower = atmosphere::density_unchecked(lower as f64);
            let rho_upper = atmosphere::density_unchecked(upper as f64);
            area += ((rho_lower + rho_upper) / 2.0) * step_len;
        }

        Ok(area)
    }
}

/// 校验高度区间：起点非负且不高于终点
pub fn check_interval(start_altitude_m: i64, end_altitude_m: i64) -> Result<()> {
    if start_altitude_m < 0 {
        return Err(XattenError::NegativeAltitude(start_altitude_m as f64));
    }
    if end_altitude_m < start_altitude_m {
        return Err(XattenError::InvertedInterval {
            start: start_altitude_m,
            end: end_altitude_m,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, rel: f64) {
        assert!(
            ((actual - expected) / expected).abs() < rel,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_invalid_step() {
        assert!(matches!(
            ColumnIntegrator::new(0),
            Err(XattenError::InvalidStep(0))
        ));
        assert!(ColumnIntegrator::new(-10).is_err());
    }

    #[test]
    fn test_interval_validation() {
        let integrator = ColumnIntegrator::default();
        assert!(matches!(
            integrator.column_density(-100, 1000),
            Err(XattenError::NegativeAltitude(_))
        ));
        assert!(matches!(
            integrator.column_density(5000, 4000),
            Err(XattenError::InvertedInterval { .. })
        ));
    }

    #[test]
    fn test_zero_width_interval_is_one_trapezoid() {
        let integrator = ColumnIntegrator::new(10).unwrap();
        let col = integrator.column_density(0, 0).unwrap();
        let expected = ((1.225 + atmosphere::density(10.0).unwrap()) / 2.0) * 10.0;
        assert_eq!(col, expected);
        assert_close(col, 12.244122112046707, 1e-12);

        let col = integrator.column_density(80000, 80000).unwrap();
        assert_close(col, 0.00015636555416335602, 1e-9);
    }

    #[test]
    fn test_reference_columns() {
        let fine = ColumnIntegrator::new(10).unwrap();
        assert_close(
            fine.column_density(50000, 100000).unwrap(),
            7.7307429582686691,
            1e-10,
        );
        assert_close(
            fine.column_density(40000, 60000).unwrap(),
            26.223687493135373,
            1e-10,
        );
        assert_close(
            fine.column_density(0, 100000).unwrap(),
            10332.280431104487,
            1e-10,
        );

        let coarse = ColumnIntegrator::new(20).unwrap();
        assert_close(
            coarse.column_density(50000, 100000).unwrap(),
            7.730727820493378,
            1e-10,
        );
        assert_close(
            coarse.column_density(0, 0).unwrap(),
            24.476497080766293,
            1e-10,
        );
    }

    #[test]
    fn test_step_sizes_converge() {
        let a = ColumnIntegrator::new(10)
            .unwrap()
            .column_density(40000, 60000)
            .unwrap();
        let b = ColumnIntegrator::new(20)
            .unwrap()
            .column_density(40000, 60000)
            .unwrap();
        assert!(((a - b) / a).abs() < 1e-3);
    }

    #[test]
    fn test_above_top_is_zero() {
        let integrator = ColumnIntegrator::default();
        assert_eq!(integrator.column_density(100001, 200000).unwrap(), 0.0);
        assert_eq!(integrator.column_density(100000, 100000).unwrap(), 0.0);
    }

    #[test]
    fn test_partial_final_step() {
        // 15 m 跨度、10 m 步长：网格点 0, 10, 20
        let integrator = ColumnIntegrator::new(10).unwrap();
        let col = integrator.column_density(0, 15).unwrap();
        let rho = |h: f64| atmosphere::density(h).unwrap();
        let expected = ((rho(0.0) + rho(10.0)) / 2.0) * 10.0
            + ((rho(10.0) + rho(20.0)) / 2.0) * 10.0
            + ((rho(20.0) + rho(30.0)) / 2.0) * 10.0;
        assert_eq!(col, expected);
    }

    #[test]
    fn test_column_grows_with_thickness() {
        let integrator = ColumnIntegrator::default();
        let thin = integrator.column_density(30000, 40000).unwrap();
        let thick = integrator.column_density(30000, 60000).unwrap();
        assert!(thick > thin);
    }

    #[test]
    fn test_end_beyond_top_matches_top() {
        let integrator = ColumnIntegrator::default();
        let at_top = integrator.column_density(0, 100_000).unwrap();
        assert_eq!(integrator.column_density(0, i64::MAX).unwrap(), at_top);
        assert_eq!(integrator.column_density(0, 250_000).unwrap(), at_top);
        assert_eq!(
            integrator.column_density(50_000, i64::MAX).unwrap(),
            integrator.column_density(50_000, 100_000).unwrap()
        );
    }

    #[test]
    fn test_huge_step_stays_finite() {
        let integrator = ColumnIntegrator::new(i64::MAX).unwrap();
        let col = integrator.column_density(0, 10).unwrap();
        assert!(col.is_finite() && col > 0.0);
    }
}
