//! # 模拟类子命令 CLI 定义
//!
//! - `density`: 密度剖面
//! - `transmission`: 透射率曲线
//! - `attenuate`: 合成能谱衰减前后对比
//! - `surface`: 能谱随高度演化
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/` 相应模块

use crate::cli::common::{AltitudeArgs, OutputArgs};
use crate::error::{Result, XattenError};

use clap::Args;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// 密度剖面
// ─────────────────────────────────────────────────────────────

/// density 子命令参数
#[derive(Args, Debug)]
pub struct DensityArgs {
    /// Single altitude in meters (overrides --range)
    #[arg(short, long, allow_negative_numbers = true)]
    pub altitude: Option<f64>,

    /// Altitude range in meters (e.g., "0-100000")
    #[arg(short, long, default_value = "0-100000")]
    pub range: String,

    /// Altitude spacing of the table in meters
    #[arg(short, long, default_value_t = 5000.0)]
    pub interval: f64,

    /// Write the profile to a CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────
// 透射率曲线
// ─────────────────────────────────────────────────────────────

/// transmission 子命令参数
#[derive(Args, Debug)]
pub struct TransmissionArgs {
    #[command(flatten)]
    pub altitude: AltitudeArgs,

    /// Report only the transmission at this photon energy in keV
    #[arg(long, allow_negative_numbers = true)]
    pub energy: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

// ─────────────────────────────────────────────────────────────
// 衰减前后对比
// ─────────────────────────────────────────────────────────────

/// attenuate 子命令参数
#[derive(Args, Debug)]
pub struct AttenuateArgs {
    #[command(flatten)]
    pub altitude: AltitudeArgs,

    /// Exponential decay factor of the initial distribution (<= 1 for a physical spectrum)
    #[arg(short, long, default_value_t = 0.99, allow_negative_numbers = true)]
    pub decay: f64,

    /// Energy spacing of plotted/exported points in keV
    #[arg(long, default_value_t = 1)]
    pub energy_step: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

// ─────────────────────────────────────────────────────────────
// 演化曲面
// ─────────────────────────────────────────────────────────────

/// surface 子命令参数
#[derive(Args, Debug)]
pub struct SurfaceArgs {
    #[command(flatten)]
    pub altitude: AltitudeArgs,

    /// Exponential decay factor of the initial distribution (<= 1 for a physical spectrum)
    #[arg(short, long, default_value_t = 0.99, allow_negative_numbers = true)]
    pub decay: f64,

    /// Altitude spacing between grid rows in meters
    #[arg(short, long, default_value_t = 2000)]
    pub interval: i64,

    /// Energy spacing between grid columns in keV
    #[arg(long, default_value_t = 5)]
    pub energy_step: u32,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// 解析高度范围 (e.g., "0-100000")
pub fn parse_altitude_range(range: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = range.split('-').collect();
    if parts.len() != 2 {
        return Err(XattenError::InvalidRange(range.to_string()));
    }

    let min: f64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| XattenError::InvalidRange(range.to_string()))?;
    let max: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| XattenError::InvalidRange(range.to_string()))?;

    if min < 0.0 || max < min {
        return Err(XattenError::InvalidRange(format!(
            "{} (must be 0 <= min <= max)",
            range
        )));
    }

    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_altitude_range() {
        assert_eq!(parse_altitude_range("0-100000").unwrap(), (0.0, 100000.0));
        assert_eq!(parse_altitude_range("500 - 800").unwrap(), (500.0, 800.0));
        assert!(parse_altitude_range("100").is_err());
        assert!(parse_altitude_range("9000-100").is_err());
        assert!(parse_altitude_range("a-b").is_err());
    }
}
