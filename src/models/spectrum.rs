//! # 能谱数据模型
//!
//! 光子能谱：1-125 keV 每个整数能量一个强度值。
//!
//! - `EnergySpectrum`: 完整能谱（合成或调用方提供）
//! - `ReconstructedSpectrum`: 逆变换结果，每个能量点可能未定义
//! - `TransmissionSample`: 单一能量下的透射率
//!
//! ## 依赖关系
//! - 被 `xray/model.rs`, `parsers/`, `xray/export.rs`, `xray/plot.rs` 使用

use crate::error::{Result, XattenError};

use serde::Deserialize;

/// 最低光子能量 (keV)
pub const MIN_ENERGY_KEV: u32 = 1;

/// 最高光子能量 (keV)
pub const MAX_ENERGY_KEV: u32 = 125;

/// 能谱点数
pub const SPECTRUM_BINS: usize = MAX_ENERGY_KEV as usize;

/// 能谱中的一个点（CSV 行）
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SpectrumPoint {
    pub energy_kev: i64,
    pub intensity: f64,
}

/// 完整能谱
#[derive(Debug, Clone, PartialEq)]
pub struct EnergySpectrum {
    /// 下标 i 对应能量 i + 1 keV
    intensities: Vec<f64>,
}

impl Default for EnergySpectrum {
    fn default() -> Self {
        Self::zeros()
    }
}

impl EnergySpectrum {
    /// 全零能谱
    pub fn zeros() -> Self {
        Self {
            intensities: vec![0.0; SPECTRUM_BINS],
        }
    }

    /// 从 125 个按能量排列的强度值构造
    pub fn from_intensities(intensities: Vec<f64>) -> Result<Self> {
        if intensities.len() != SPECTRUM_BINS {
            return Err(XattenError::Other(format!(
                "Spectrum must have {} entries, got {}",
                SPECTRUM_BINS,
                intensities.len()
            )));
        }
        for (i, &value) in intensities.iter().enumerate() {
            check_intensity(i as i64 + 1, value)?;
        }
        Ok(Self { intensities })
    }

    /// 从离散点构造
    ///
    /// 未出现的能量强度为 0；同一能量多次出现时取最大值。
    pub fn from_points<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = SpectrumPoint>,
    {
        let mut spectrum = Self::zeros();
        for point in points {
            if point.energy_kev < MIN_ENERGY_KEV as i64 || point.energy_kev > MAX_ENERGY_KEV as i64
            {
                return Err(XattenError::EnergyOutOfRange(point.energy_kev));
            }
            check_intensity(point.energy_kev, point.intensity)?;

            let slot = &mut spectrum.intensities[(point.energy_kev - 1) as usize];
            if point.intensity > *slot {
                *slot = point.intensity;
            }
        }
        Ok(spectrum)
    }

    /// 获取某能量 (keV) 的强度
    pub fn intensity(&self, energy_kev: u32) -> Option<f64> {
        if energy_kev < MIN_ENERGY_KEV {
            return None;
        }
        self.intensities.get(energy_kev as usize - 1).copied()
    }

    /// 遍历 (能量, 强度)
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.intensities
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as u32 + 1, v))
    }

    /// 最大强度
    pub fn peak(&self) -> f64 {
        self.intensities.iter().copied().fold(0.0, f64::max)
    }

    /// 强度总和
    pub fn total(&self) -> f64 {
        self.intensities.iter().sum()
    }
}

fn check_intensity(energy_kev: i64, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(XattenError::InvalidIntensity {
            energy: energy_kev,
            value,
        });
    }
    Ok(())
}

/// 逆变换中单个能量点的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpectrumValue {
    /// 可重建的强度
    Defined(f64),
    /// 透射率过低或重建值超出上限
    Undefined,
}

impl SpectrumValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            SpectrumValue::Defined(v) => Some(*v),
            SpectrumValue::Undefined => None,
        }
    }
}

/// 逆变换得到的部分能谱
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedSpectrum {
    values: Vec<SpectrumValue>,
}

impl ReconstructedSpectrum {
    pub(crate) fn new(values: Vec<SpectrumValue>) -> Self {
        debug_assert_eq!(values.len(), SPECTRUM_BINS);
        Self { values }
    }

    /// 获取某能量 (keV) 的结果
    pub fn value(&self, energy_kev: u32) -> Option<SpectrumValue> {
        if energy_kev < MIN_ENERGY_KEV {
            return None;
        }
        self.values.get(energy_kev as usize - 1).copied()
    }
}

/// 单一能量下的透射率
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionSample {
    pub energy_kev: u32,
    /// 透射分数，0-1
    pub fraction: f64,
}
