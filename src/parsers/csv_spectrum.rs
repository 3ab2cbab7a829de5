//! # CSV 能谱解析器
//!
//! ## 格式说明
//! ```text
//! energy_kev,intensity
//! 1,99.0
//! 2,98.01
//! ...
//! ```
//!
//! 缺失的能量强度为 0，重复能量取最大值。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `csv` + `serde` 反序列化为 `SpectrumPoint`

use crate::error::{Result, XattenError};
use crate::models::{EnergySpectrum, SpectrumPoint};
use std::fs;
use std::path::Path;

/// 解析 CSV 能谱文件
pub fn parse_csv_file(path: &Path) -> Result<EnergySpectrum> {
    let content = fs::read_to_string(path).map_err(|e| XattenError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_csv_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 CSV 能谱
pub fn parse_csv_content(content: &str, source_name: &str) -> Result<EnergySpectrum> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(content.as_bytes());

    let mut points = Vec::new();
    for record in rdr.deserialize::<SpectrumPoint>() {
        let point = record.map_err(|e| XattenError::ParseError {
            format: "CSV".to_string(),
            path: source_name.to_string(),
            reason: e.to_string(),
        })?;
        points.push(point);
    }

    EnergySpectrum::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let content = "energy_kev,intensity\n1, 80.0\n2,60\n2,70\n125,5.5\n";
        let spectrum = parse_csv_content(content, "test.csv").unwrap();
        assert_eq!(spectrum.intensity(1), Some(80.0));
        assert_eq!(spectrum.intensity(2), Some(70.0));
        assert_eq!(spectrum.intensity(3), Some(0.0));
        assert_eq!(spectrum.intensity(125), Some(5.5));
    }

    #[test]
    fn test_parse_csv_errors() {
        let bad_number = "energy_kev,intensity\n1,abc\n";
        assert!(matches!(
            parse_csv_content(bad_number, "bad.csv"),
            Err(XattenError::ParseError { .. })
        ));

        let out_of_range = "energy_kev,intensity\n200,1.0\n";
        assert!(matches!(
            parse_csv_content(out_of_range, "range.csv"),
            Err(XattenError::EnergyOutOfRange(200))
        ));
    }
}
