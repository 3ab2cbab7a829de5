//! # XY 文本能谱解析器
//!
//! 每行 `energy intensity`，空白或逗号分隔；`#` 开头为注释。
//! 与 `xray/export.rs` 写出的 XY 文件兼容。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/spectrum.rs`

use crate::error::{Result, XattenError};
use crate::models::{EnergySpectrum, SpectrumPoint};
use std::fs;
use std::path::Path;

/// 解析 XY 能谱文件
pub fn parse_xy_file(path: &Path) -> Result<EnergySpectrum> {
    let content = fs::read_to_string(path).map_err(|e| XattenError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_xy_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 XY 能谱
pub fn parse_xy_content(content: &str, source_name: &str) -> Result<EnergySpectrum> {
    let parse_error = |line_no: usize, reason: String| XattenError::ParseError {
        format: "XY".to_string(),
        path: source_name.to_string(),
        reason: format!("line {}: {}", line_no, reason),
    };

    let mut points = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .collect();
        if fields.len() < 2 {
            return Err(parse_error(i + 1, "expected 'energy intensity'".to_string()));
        }

        let energy: f64 = fields[0]
            .parse()
            .map_err(|_| parse_error(i + 1, format!("invalid energy '{}'", fields[0])))?;
        if energy.fract() != 0.0 {
            return Err(parse_error(
                i + 1,
                format!("energy '{}' is not a whole keV", fields[0]),
            ));
        }
        let intensity: f64 = fields[1]
            .parse()
            .map_err(|_| parse_error(i + 1, format!("invalid intensity '{}'", fields[1])))?;

        points.push(SpectrumPoint {
            energy_kev: energy as i64,
            intensity,
        });
    }

    EnergySpectrum::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xy() {
        let content = "# Spectrum: test\n# Columns: energy, intensity\n1\t50.0\n 2  40.5\n3,30\n\n";
        let spectrum = parse_xy_content(content, "test.xy").unwrap();
        assert_eq!(spectrum.intensity(1), Some(50.0));
        assert_eq!(spectrum.intensity(2), Some(40.5));
        assert_eq!(spectrum.intensity(3), Some(30.0));
        assert_eq!(spectrum.intensity(4), Some(0.0));
    }

    #[test]
    fn test_parse_xy_errors() {
        assert!(matches!(
            parse_xy_content("1\n", "a.xy"),
            Err(XattenError::ParseError { .. })
        ));
        assert!(matches!(
            parse_xy_content("1.5 3.0\n", "b.xy"),
            Err(XattenError::ParseError { .. })
        ));
        assert!(matches!(
            parse_xy_content("4 -3.0\n", "c.xy"),
            Err(XattenError::InvalidIntensity { .. })
        ));
    }
}
