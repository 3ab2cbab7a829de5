//! # 数据导出
//!
//! 导出透射率曲线、能谱对比、演化网格与密度剖面到 CSV 和 XY 格式。
//!
//! ## 支持格式
//! - CSV: 带表头的完整数据；逆变换中未定义的点写为空单元格
//! - XY: `#` 注释头 + 制表符分隔列；未定义的点直接省略
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/` 与 `xray/model.rs` 的数据结构
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{Result, XattenError};
use crate::models::{SpectrumComparison, TransmissionSample};
use crate::xray::model::EvolutionGrid;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 密度剖面中的一行
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityRow {
    pub altitude_m: f64,
    pub layer: usize,
    pub density: f64,
}

fn write_error(path: &Path) -> impl Fn(std::io::Error) -> XattenError + '_ {
    move |e| XattenError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(write_error(path))
}

fn finish_csv<W: Write>(mut wtr: csv::Writer<W>, path: &Path) -> Result<()> {
    wtr.flush().map_err(write_error(path))
}

/// 导出透射率曲线为 CSV 格式
pub fn transmission_to_csv(samples: &[TransmissionSample], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["energy_kev", "transmission"])?;
    for s in samples {
        wtr.write_record([s.energy_kev.to_string(), format!("{:.9e}", s.fraction)])?;
    }

    finish_csv(wtr, output_path)
}

/// 导出透射率曲线为 XY 格式
pub fn transmission_to_xy(
    samples: &[TransmissionSample],
    start_altitude_m: i64,
    end_altitude_m: i64,
    output_path: &Path,
) -> Result<()> {
    let mut file = create_file(output_path)?;
    let err = write_error(output_path);

    writeln!(
        file,
        "# Transmission: {} m -> {} m",
        start_altitude_m, end_altitude_m
    )
    .map_err(&err)?;
    writeln!(file, "# Columns: energy (keV), transmission fraction").map_err(&err)?;
    writeln!(file, "#").map_err(&err)?;

    for s in samples {
        writeln!(file, "{}\t{:.9e}", s.energy_kev, s.fraction).map_err(&err)?;
    }

    file.flush().map_err(&err)
}

/// 导出能谱对比为 CSV 格式
pub fn comparison_to_csv(cmp: &SpectrumComparison, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "energy_kev".to_string(),
        cmp.first_label.to_lowercase(),
        cmp.second_label.to_lowercase(),
    ])?;

    for row in &cmp.rows {
        wtr.write_record([
            row.energy_kev.to_string(),
            format!("{:.6}", row.first),
            row.second.map(|v| format!("{:.6}", v)).unwrap_or_default(),
        ])?;
    }

    finish_csv(wtr, output_path)
}

/// 导出能谱对比为 XY 格式（三列）
pub fn comparison_to_xy(cmp: &SpectrumComparison, output_path: &Path) -> Result<()> {
    let mut file = create_file(output_path)?;
    let err = write_error(output_path);

    writeln!(file, "# Spectrum: {}", cmp.name).map_err(&err)?;
    writeln!(
        file,
        "# Columns: energy (keV), {} intensity, {} intensity",
        cmp.first_label, cmp.second_label
    )
    .map_err(&err)?;
    if cmp.undefined_count() > 0 {
        writeln!(
            file,
            "# {} energies with undefined {} intensity omitted",
            cmp.undefined_count(),
            cmp.second_label
        )
        .map_err(&err)?;
    }
    writeln!(file, "#").map_err(&err)?;

    for row in &cmp.rows {
        if let Some(second) = row.second {
            writeln!(file, "{}\t{:.6}\t{:.6}", row.energy_kev, row.first, second)
                .map_err(&err)?;
        }
    }

    file.flush().map_err(&err)
}

/// 导出第二条曲线为两列 XY 能谱，可作为后续计算的输入
pub fn spectrum_to_xy(cmp: &SpectrumComparison, output_path: &Path) -> Result<()> {
    let mut file = create_file(output_path)?;
    let err = write_error(output_path);

    writeln!(file, "# Spectrum: {} ({})", cmp.name, cmp.second_label).map_err(&err)?;
    writeln!(file, "# Columns: energy (keV), intensity").map_err(&err)?;
    writeln!(file, "#").map_err(&err)?;

    for row in &cmp.rows {
        if let Some(v) = row.second {
            writeln!(file, "{}\t{:.6}", row.energy_kev, v).map_err(&err)?;
        }
    }

    file.flush().map_err(&err)
}

/// 导出演化网格为 CSV 格式
pub fn grid_to_csv(grid: &EvolutionGrid, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["altitude_km", "energy_kev", "intensity"])?;
    for (h, e, i) in grid.cells() {
        wtr.write_record([
            format!("{:.3}", h as f64 / 1000.0),
            e.to_string(),
            format!("{:.6}", i),
        ])?;
    }

    finish_csv(wtr, output_path)
}

/// 导出演化网格为 XY 格式（三列）
pub fn grid_to_xy(grid: &EvolutionGrid, output_path: &Path) -> Result<()> {
    let mut file = create_file(output_path)?;
    let err = write_error(output_path);

    writeln!(file, "# Surface evolution").map_err(&err)?;
    writeln!(
        file,
        "# Columns: altitude (km), energy (keV), intensity"
    )
    .map_err(&err)?;
    writeln!(file, "#").map_err(&err)?;

    for (h, e, i) in grid.cells() {
        writeln!(file, "{:.3}\t{}\t{:.6}", h as f64 / 1000.0, e, i).map_err(&err)?;
    }

    file.flush().map_err(&err)
}

/// 导出密度剖面为 CSV 格式
pub fn density_to_csv(rows: &[DensityRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["altitude_m", "layer", "density_kg_m3"])?;
    for r in rows {
        wtr.write_record([
            format!("{:.1}", r.altitude_m),
            r.layer.to_string(),
            format!("{:.9e}", r.density),
        ])?;
    }

    finish_csv(wtr, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnergySpectrum;
    use crate::parsers::xy::parse_xy_content;
    use crate::xray::model::{synthesize, AttenuationModel};

    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("xatten_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_comparison_csv_marks_undefined_as_empty() {
        let model = AttenuationModel::default();
        let detected = EnergySpectrum::from_intensities(vec![1.0; 125]).unwrap();
        let restored = model.backward(&detected, 50000, 100000).unwrap();
        let cmp = SpectrumComparison::backward("sensor", &detected, &restored);

        let path = temp_path("backward.csv");
        comparison_to_csv(&cmp, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("energy_kev,final,initial"));
        assert_eq!(lines.next(), Some("1,1.000000,"));
        assert_eq!(text.lines().count(), 126);
    }

    #[test]
    fn test_spectrum_xy_can_be_read_back() {
        let model = AttenuationModel::default();
        let initial = synthesize(0.99).unwrap();
        let attenuated = model.forward(&initial, 60000, 100000).unwrap();
        let cmp = SpectrumComparison::forward("synthetic", &initial, &attenuated);

        let path = temp_path("forward.xy");
        spectrum_to_xy(&cmp, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        let parsed = parse_xy_content(&text, "forward.xy").unwrap();
        for e in [10u32, 50, 125] {
            let expected = attenuated.intensity(e).unwrap();
            let got = parsed.intensity(e).unwrap();
            assert!((got - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_grid_csv_row_count() {
        let model = AttenuationModel::new(crate::xray::model::ModelConfig {
            step_m: 50,
            ..Default::default()
        })
        .unwrap();
        let grid = model
            .evolution(&synthesize(0.99).unwrap(), 90000, 100000, 5000, 25)
            .unwrap();

        let path = temp_path("grid.csv");
        grid_to_csv(&grid, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        // 3 个高度 × 5 个能量 + 表头
        assert_eq!(text.lines().count(), 16);
        assert!(text.starts_with("altitude_km,energy_kev,intensity"));
    }
}
