//! # 能谱对比数据
//!
//! 将变换前后的两条能谱按能量对齐，供表格、导出与绘图使用。
//! 逆变换结果中未定义的点以 `None` 表示。
//!
//! ## 依赖关系
//! - 被 `xray/export.rs`, `xray/plot.rs`, `commands/` 使用
//! - 使用 `models/spectrum.rs`

use crate::models::{EnergySpectrum, ReconstructedSpectrum};

/// 对比表中的一行
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonRow {
    pub energy_kev: u32,
    pub first: f64,
    pub second: Option<f64>,
}

/// 两条能谱的对比
#[derive(Debug, Clone)]
pub struct SpectrumComparison {
    /// 名称（文件名或描述）
    pub name: String,
    /// 第一条曲线标签
    pub first_label: String,
    /// 第二条曲线标签
    pub second_label: String,
    pub rows: Vec<ComparisonRow>,
}

impl SpectrumComparison {
    /// 正向：初始能谱 → 衰减后能谱
    pub fn forward(name: &str, initial: &EnergySpectrum, attenuated: &EnergySpectrum) -> Self {
        let rows = initial
            .iter()
            .zip(attenuated.iter())
            .map(|((energy_kev, first), (_, second))| ComparisonRow {
                energy_kev,
                first,
                second: Some(second),
            })
            .collect();

        Self {
            name: name.to_string(),
            first_label: "Initial".to_string(),
            second_label: "Final".to_string(),
            rows,
        }
    }

    /// 逆向：探测到的能谱 → 重建的源能谱
    pub fn backward(
        name: &str,
        detected: &EnergySpectrum,
        reconstructed: &ReconstructedSpectrum,
    ) -> Self {
        let rows = detected
            .iter()
            .map(|(energy_kev, first)| ComparisonRow {
                energy_kev,
                first,
                second: reconstructed.value(energy_kev).and_then(|v| v.value()),
            })
            .collect();

        Self {
            name: name.to_string(),
            first_label: "Final".to_string(),
            second_label: "Initial".to_string(),
            rows,
        }
    }

    /// 按能量步长抽稀（保留 1, 1+step, ...）
    pub fn thinned(&self, energy_step: u32) -> Self {
        let step = energy_step.max(1) as usize;
        Self {
            rows: self.rows.iter().step_by(step).copied().collect(),
            ..self.clone()
        }
    }

    /// 两条曲线中的最大值
    pub fn peak(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|r| std::iter::once(r.first).chain(r.second))
            .fold(0.0, f64::max)
    }

    /// 第二条曲线未定义的点数
    pub fn undefined_count(&self) -> usize {
        self.rows.iter().filter(|r| r.second.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpectrumValue;

    #[test]
    fn test_backward_comparison_keeps_gaps() {
        let detected = EnergySpectrum::from_intensities(vec![10.0; 125]).unwrap();
        let mut values = vec![SpectrumValue::Defined(20.0); 125];
        values[4] = SpectrumValue::Undefined;
        let reconstructed = ReconstructedSpectrum::new(values);

        let cmp = SpectrumComparison::backward("sensor", &detected, &reconstructed);
        assert_eq!(cmp.rows.len(), 125);
        assert_eq!(cmp.rows[4].second, None);
        assert_eq!(cmp.undefined_count(), 1);
        assert_eq!(cmp.peak(), 20.0);
    }

    #[test]
    fn test_thinned() {
        let s = EnergySpectrum::zeros();
        let cmp = SpectrumComparison::forward("flat", &s, &s).thinned(5);
        let energies: Vec<u32> = cmp.rows.iter().map(|r| r.energy_kev).collect();
        assert_eq!(energies.len(), 25);
        assert_eq!(energies[0], 1);
        assert_eq!(energies[1], 6);
        assert_eq!(energies[24], 121);
    }
}
