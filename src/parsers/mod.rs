//! # 解析器模块
//!
//! 读取调用方提供的能谱文件。
//!
//! ## 依赖关系
//! - 被 `commands/propagate.rs` 使用
//! - 使用 `models/spectrum.rs` 数据模型
//! - 子模块: csv_spectrum, xy

pub mod csv_spectrum;
pub mod xy;

use crate::error::Result;
use crate::models::EnergySpectrum;
use std::path::Path;

/// 从文件扩展名推断格式并解析能谱
///
/// `.csv` 按 CSV 解析，其余按 XY 文本解析。
pub fn parse_spectrum_file(path: &Path) -> Result<EnergySpectrum> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => csv_spectrum::parse_csv_file(path),
        _ => xy::parse_xy_file(path),
    }
}
