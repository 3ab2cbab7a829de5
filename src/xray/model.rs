//! # X 射线衰减模型
//!
//! 将柱密度与衰减系数组合为透射率（Beer–Lambert 定律），
//! 并在整条能谱上进行正向/逆向变换。
//!
//! ## 算法概述
//! 1. 对 [start, end] 积分得到柱密度 N（与能量无关，每个区间只积分一次）
//! 2. 透射率 T(E) = exp(−μ(E) · N)
//! 3. 正向：I_out(E) = I(E) · T(E)
//! 4. 逆向：I_in(E) = I(E) / T(E)，T < 最小透射率或结果超过上限时未定义
//!
//! 所有计算都是纯函数，可并发调用。
//!
//! ## 依赖关系
//! - 被 `commands/` 下各子命令调用
//! - 使用 `xray/column.rs`, `xray/coefficient.rs`
//! - 使用 `models/spectrum.rs` 的能谱结构
//! - 使用 `rayon` 并行计算演化网格

use crate::error::{Result, XattenError};
use crate::models::{
    EnergySpectrum, ReconstructedSpectrum, SpectrumValue, TransmissionSample, MAX_ENERGY_KEV,
    MIN_ENERGY_KEV,
};
use crate::xray::coefficient::attenuation_coefficient;
use crate::xray::column::{check_interval, ColumnIntegrator, DEFAULT_STEP_M};

use rayon::prelude::*;

/// 逆变换的最小透射率
pub const DEFAULT_MIN_TRANSMISSION: f64 = 1e-6;

/// 逆变换重建强度上限
pub const DEFAULT_MAX_RECONSTRUCTED: f64 = 500.0;

/// 合成能谱在 0 keV 处的外推强度
pub const SYNTHETIC_AMPLITUDE: f64 = 100.0;

/// 模型数值参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    /// 积分步长 (m)
    pub step_m: i64,
    /// 低于此透射率时逆变换未定义
    pub min_transmission: f64,
    /// 逆变换结果超过此值时视为未定义
    pub max_reconstructed: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            step_m: DEFAULT_STEP_M,
            min_transmission: DEFAULT_MIN_TRANSMISSION,
            max_reconstructed: DEFAULT_MAX_RECONSTRUCTED,
        }
    }
}

impl ModelConfig {
    /// 校验参数
    pub fn validate(&self) -> Result<()> {
        if self.step_m <= 0 {
            return Err(XattenError::InvalidStep(self.step_m));
        }
        if !self.min_transmission.is_finite() || self.min_transmission < 0.0 {
            return Err(XattenError::InvalidThreshold {
                name: "min_transmission".to_string(),
                value: self.min_transmission,
            });
        }
        if !self.max_reconstructed.is_finite() || self.max_reconstructed < 0.0 {
            return Err(XattenError::InvalidThreshold {
                name: "max_reconstructed".to_string(),
                value: self.max_reconstructed,
            });
        }
        Ok(())
    }
}

/// 高度-能量演化网格
#[derive(Debug, Clone)]
pub struct EvolutionGrid {
    /// 行对应的高度 (m)
    pub altitudes_m: Vec<i64>,
    /// 列对应的能量 (keV)
    pub energies_kev: Vec<u32>,
    /// intensities[行][列]
    pub intensities: Vec<Vec<f64>>,
}

impl EvolutionGrid {
    /// 最大强度
    pub fn peak(&self) -> f64 {
        self.intensities
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }

    /// 按行展开为 (高度 m, 能量 keV, 强度)
    pub fn cells(&self) -> impl Iterator<Item = (i64, u32, f64)> + '_ {
        self.altitudes_m
            .iter()
            .zip(&self.intensities)
            .flat_map(move |(&h, row)| {
                self.energies_kev
                    .iter()
                    .zip(row)
                    .map(move |(&e, &i)| (h, e, i))
            })
    }
}

/// 大气 X 射线衰减模型
#[derive(Debug, Clone, Copy)]
pub struct AttenuationModel {
    integrator: ColumnIntegrator,
    min_transmission: f64,
    max_reconstructed: f64,
}

impl Default for AttenuationModel {
    fn default() -> Self {
        Self {
            integrator: ColumnIntegrator::default(),
            min_transmission: DEFAULT_MIN_TRANSMISSION,
            max_reconstructed: DEFAULT_MAX_RECONSTRUCTED,
        }
    }
}

impl AttenuationModel {
    /// 由配置创建模型
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            integrator: ColumnIntegrator::new(config.step_m)?,
            min_transmission: config.min_transmission,
            max_reconstructed: config.max_reconstructed,
        })
    }

    /// 积分步长 (m)
    pub fn step_m(&self) -> i64 {
        self.integrator.step_m()
    }

    /// [start, end] 区间的柱密度 (kg/m²)
    pub fn column_density(&self, start_altitude_m: i64, end_altitude_m: i64) -> Result<f64> {
        self.integrator
            .column_density(start_altitude_m, end_altitude_m)
    }

    /// 单一能量的透射率
    pub fn transmission(
        &self,
        start_altitude_m: i64,
        end_altitude_m: i64,
        energy_kev: f64,
    ) -> Result<f64> {
        let coefficient = attenuation_coefficient(energy_kev)?;
        let column = self.column_density(start_altitude_m, end_altitude_m)?;
        Ok(beer_lambert(coefficient, column))
    }

    /// 1-125 keV 全部能量的透射率
    pub fn transmission_curve(
        &self,
        start_altitude_m: i64,
        end_altitude_m: i64,
    ) -> Result<Vec<TransmissionSample>> {
        let column = self.column_density(start_altitude_m, end_altitude_m)?;
        spectrum_energies()
            .map(|energy_kev| {
                Ok(TransmissionSample {
                    energy_kev,
                    fraction: transmission_for_column(column, energy_kev as f64)?,
                })
            })
            .collect()
    }

    /// 正向变换：初始能谱经过 [start, end] 后的能谱
    pub fn forward(
        &self,
        spectrum: &EnergySpectrum,
        start_altitude_m: i64,
        end_altitude_m: i64,
    ) -> Result<EnergySpectrum> {
        let curve = self.transmission_curve(start_altitude_m, end_altitude_m)?;
        let attenuated = spectrum
            .iter()
            .zip(&curve)
            .map(|((_, intensity), sample)| intensity * sample.fraction)
            .collect();
        EnergySpectrum::from_intensities(attenuated)
    }

    /// 逆向变换：由探测到的能谱重建 start 处的能谱
    pub fn backward(
        &self,
        spectrum: &EnergySpectrum,
        start_altitude_m: i64,
        end_altitude_m: i64,
    ) -> Result<ReconstructedSpectrum> {
        let curve = self.transmission_curve(start_altitude_m, end_altitude_m)?;
        let values = spectrum
            .iter()
            .zip(&curve)
            .map(|((_, intensity), sample)| self.invert(intensity, sample.fraction))
            .collect();
        Ok(ReconstructedSpectrum::new(values))
    }

    fn invert(&self, intensity: f64, fraction: f64) -> SpectrumValue {
        if fraction < self.min_transmission || fraction <= 0.0 {
            return SpectrumValue::Undefined;
        }
        let candidate = intensity / fraction;
        if candidate.is_nan() || candidate > self.max_reconstructed {
            SpectrumValue::Undefined
        } else {
            SpectrumValue::Defined(candidate)
        }
    }

    /// 能谱随高度的演化网格
    ///
    /// 高度从 start 起每隔 `interval_m` 取一行，直到达到或越过 end；
    /// 每行 h 的强度为 spectrum(E) · T(start, h, E)。
    pub fn evolution(
        &self,
        spectrum: &EnergySpectrum,
        start_altitude_m: i64,
        end_altitude_m: i64,
        interval_m: i64,
        energy_step: u32,
    ) -> Result<EvolutionGrid> {
        check_interval(start_altitude_m, end_altitude_m)?;
        if interval_m <= 0 {
            return Err(XattenError::InvalidRange(format!(
                "altitude interval must be > 0 m, got {}",
                interval_m
            )));
        }
        if energy_step == 0 {
            return Err(XattenError::InvalidRange(
                "energy step must be >= 1 keV".to_string(),
            ));
        }

        let past_end = end_altitude_m.checked_add(interval_m).ok_or_else(|| {
            XattenError::InvalidRange(format!(
                "altitude grid {}..{} step {} m overflows",
                start_altitude_m, end_altitude_m, interval_m
            ))
        })?;

        let altitudes_m: Vec<i64> = (start_altitude_m..past_end)
            .step_by(interval_m as usize)
            .collect();
        let energies_kev: Vec<u32> = spectrum_energies().step_by(energy_step as usize).collect();

        let columns: Vec<f64> = altitudes_m
            .par_iter()
            .map(|&h| self.column_density(start_altitude_m, h))
            .collect::<Result<Vec<_>>>()?;

        let intensities = columns
            .iter()
            .map(|&column| {
                energies_kev
                    .iter()
                    .map(|&e| {
                        let initial = spectrum.intensity(e).unwrap_or(0.0);
                        Ok(initial * transmission_for_column(column, e as f64)?)
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(EvolutionGrid {
            altitudes_m,
            energies_kev,
            intensities,
        })
    }
}

/// 已知柱密度时某能量的透射率
pub fn transmission_for_column(column_density: f64, energy_kev: f64) -> Result<f64> {
    Ok(beer_lambert(attenuation_coefficient(energy_kev)?, column_density))
}

fn beer_lambert(coefficient: f64, column_density: f64) -> f64 {
    (-coefficient * column_density).exp()
}

/// 合成指数衰减初始能谱：I(E) = 100 · decay^E
///
/// decay > 1 时得到随能量递增的非物理能谱，由调用方负责。
pub fn synthesize(decay_factor: f64) -> Result<EnergySpectrum> {
    if !decay_factor.is_finite() || decay_factor <= 0.0 {
        return Err(XattenError::NonPositiveDecayFactor(decay_factor));
    }
    let intensities = spectrum_energies()
        .map(|e| SYNTHETIC_AMPLITUDE * decay_factor.powf(e as f64))
        .collect();
    EnergySpectrum::from_intensities(intensities)
}

fn spectrum_energies() -> impl Iterator<Item = u32> {
    MIN_ENERGY_KEV..=MAX_ENERGY_KEV
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

    fn model_with_step(step_m: i64) -> AttenuationModel {
        AttenuationModel::new(ModelConfig {
            step_m,
            ..ModelConfig::default()
        })
        .unwrap()
    }

    fn undefined_count(spectrum: &ReconstructedSpectrum) -> usize {
        (MIN_ENERGY_KEV..=MAX_ENERGY_KEV)
            .filter(|&e| spectrum.value(e) == Some(SpectrumValue::Undefined))
            .count()
    }

    #[test]
    fn test_config_validation() {
        assert!(ModelConfig::default().validate().is_ok());
        let bad_step = ModelConfig {
            step_m: 0,
            ..ModelConfig::default()
        };
        assert!(matches!(
            AttenuationModel::new(bad_step),
            Err(XattenError::InvalidStep(0))
        ));
        let bad_threshold = ModelConfig {
            min_transmission: f64::NAN,
            ..ModelConfig::default()
        };
        assert!(matches!(
            bad_threshold.validate(),
            Err(XattenError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_synthesize() {
        let s = synthesize(0.99).unwrap();
        assert_close(s.intensity(1).unwrap(), 99.0, 1e-14);
        assert_close(s.intensity(125).unwrap(), 28.470777327319546, 1e-12);
        assert_eq!(s.iter().count(), 125);

        assert!(matches!(
            synthesize(0.0),
            Err(XattenError::NonPositiveDecayFactor(_))
        ));
        assert!(synthesize(-0.5).is_err());
        // decay > 1 允许，但能谱递增
        let rising = synthesize(1.01).unwrap();
        assert!(rising.intensity(125).unwrap() > rising.intensity(1).unwrap());
    }

    #[test]
    fn test_reference_transmission() {
        let t = model_with_step(10).transmission(50000, 100000, 30.0).unwrap();
        assert!(t > 0.0 && t < 1.0);
        assert_close(t, 0.60036378668566692, 1e-10);

        let t = model_with_step(20).transmission(50000, 100000, 30.0).unwrap();
        assert_close(t, 0.60036438649411106, 1e-10);
    }

    #[test]
    fn test_zero_width_transmission() {
        let model = AttenuationModel::default();
        for e in [1.0, 30.0, 125.0] {
            assert_eq!(model.transmission(100000, 100000, e).unwrap(), 1.0);
            assert_eq!(model.transmission(120000, 120000, e).unwrap(), 1.0);
        }
        // 海平面零宽区间仍有一个补齐步长的梯形
        assert_close(
            model.transmission(0, 0, 30.0).unwrap(),
            0.44570545876214868,
            1e-10,
        );
        assert!(model.transmission(90000, 90000, 60.0).unwrap() > 0.9999);
    }

    #[test]
    fn test_transmission_to_unbounded_end() {
        let model = AttenuationModel::default();
        let bounded = model.transmission(50000, 100000, 30.0).unwrap();
        let unbounded = model.transmission(50000, i64::MAX, 30.0).unwrap();
        assert_eq!(bounded, unbounded);
        assert!(unbounded < 1.0);
    }

    #[test]
    fn test_transmission_monotonic_in_thickness() {
        let model = model_with_step(20);
        for energy in [10.0, 30.0, 90.0] {
            let mut prev = 1.0;
            for end in (40000..=100000).step_by(10000) {
                let t = model.transmission(40000, end, energy).unwrap();
                assert!(t <= prev, "transmission rose at end = {}", end);
                prev = t;
            }
        }
    }

    #[test]
    fn test_transmission_increases_with_energy() {
        let curve = AttenuationModel::default()
            .transmission_curve(50000, 100000)
            .unwrap();
        assert_eq!(curve.len(), 125);
        assert_eq!(curve[0].energy_kev, 1);
        for pair in curve.windows(2) {
            assert!(pair[1].fraction >= pair[0].fraction);
        }
    }

    #[test]
    fn test_domain_errors_propagate() {
        let model = AttenuationModel::default();
        assert!(matches!(
            model.transmission(50000, 100000, 0.0),
            Err(XattenError::NonPositiveEnergy(_))
        ));
        assert!(matches!(
            model.transmission(-1, 100000, 10.0),
            Err(XattenError::NegativeAltitude(_))
        ));
        assert!(matches!(
            model.transmission(60000, 50000, 10.0),
            Err(XattenError::InvertedInterval { .. })
        ));
    }

    #[test]
    fn test_forward_matches_pointwise_transmission() {
        let model = model_with_step(20);
        let initial = synthesize(0.99).unwrap();
        let out = model.forward(&initial, 60000, 90000).unwrap();
        for e in [1u32, 17, 64, 125] {
            let expected =
                initial.intensity(e).unwrap() * model.transmission(60000, 90000, e as f64).unwrap();
            assert_eq!(out.intensity(e).unwrap(), expected);
        }
        // 原能谱不变
        assert_eq!(initial, synthesize(0.99).unwrap());
    }

    #[test]
    fn test_forward_backward_round_trip() {
        let model = AttenuationModel::default();
        let initial = synthesize(0.99).unwrap();
        let detected = model.forward(&initial, 50000, 100000).unwrap();
        let restored = model.backward(&detected, 50000, 100000).unwrap();

        // 1-6 keV 透射率低于 1e-6
        for e in 1..=6 {
            assert_eq!(restored.value(e), Some(SpectrumValue::Undefined));
        }
        for e in 7..=125 {
            let value = restored.value(e).and_then(|v| v.value()).unwrap();
            assert_close(value, initial.intensity(e).unwrap(), 1e-9);
        }
        assert_eq!(undefined_count(&restored), 6);
    }

    #[test]
    fn test_backward_cutoff_above_max() {
        let model = AttenuationModel::default();
        let flat = EnergySpectrum::from_intensities(vec![100.0; 125]).unwrap();
        let restored = model.backward(&flat, 50000, 100000).unwrap();
        // 10 keV: T ≈ 0.0143，100 / T 超过 500
        assert_eq!(restored.value(10), Some(SpectrumValue::Undefined));
        // 125 keV: T ≈ 0.705
        let v = restored.value(125).and_then(|v| v.value()).unwrap();
        assert!(v > 100.0 && v < 500.0);
    }

    #[test]
    fn test_thresholds_configurable() {
        let relaxed = AttenuationModel::new(ModelConfig {
            max_reconstructed: 1.0e6,
            ..ModelConfig::default()
        })
        .unwrap();
        let flat = EnergySpectrum::from_intensities(vec![100.0; 125]).unwrap();
        let restored = relaxed.backward(&flat, 50000, 100000).unwrap();
        assert!(matches!(restored.value(10), Some(SpectrumValue::Defined(_))));
        // 7 keV: 100 / T ≈ 8.0e6，仍超过上限
        assert_eq!(restored.value(7), Some(SpectrumValue::Undefined));
        assert_eq!(undefined_count(&restored), 7);
    }

    #[test]
    fn test_evolution_grid() {
        let model = model_with_step(20);
        let initial = synthesize(0.99).unwrap();
        let grid = model.evolution(&initial, 50000, 55000, 2000, 5).unwrap();

        // 50000, 52000, 54000, 56000
        assert_eq!(grid.altitudes_m, vec![50000, 52000, 54000, 56000]);
        assert_eq!(grid.energies_kev.len(), 25);
        assert_eq!(grid.energies_kev[1], 6);
        assert_eq!(grid.cells().count(), 4 * 25);

        let expected = initial.intensity(6).unwrap()
            * model.transmission(50000, 54000, 6.0).unwrap();
        assert_eq!(grid.intensities[2][1], expected);
        assert!(grid.peak() <= initial.peak());

        assert!(model.evolution(&initial, 50000, 55000, 0, 5).is_err());
        assert!(matches!(
            model.evolution(&initial, 50000, i64::MAX, 2000, 5),
            Err(XattenError::InvalidRange(_))
        ));
        assert!(model.evolution(&initial, 50000, 55000, 2000, 0).is_err());
    }
}
