//! # 子命令共用参数
//!
//! 高度区间、输出格式与图像尺寸等参数。
//!
//! ## 依赖关系
//! - 被 `cli/simulate.rs`, `cli/propagate.rs` 使用

use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

/// 高度区间参数
#[derive(Args, Debug, Clone, Copy)]
pub struct AltitudeArgs {
    /// Detonation (source) altitude in meters
    #[arg(short, long, default_value_t = 50000, allow_negative_numbers = true)]
    pub start: i64,

    /// Sensor altitude in meters (anything above 100 km adds no attenuation)
    #[arg(short, long, default_value_t = 100000, allow_negative_numbers = true)]
    pub end: i64,
}

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file
    Csv,
    /// XY text data file
    Xy,
}

impl OutputFormat {
    /// 对应的文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Csv => "csv",
            OutputFormat::Xy => "xy",
        }
    }

    /// 从文件扩展名推断输出格式
    pub fn from_extension(path: &Path) -> OutputFormat {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("svg") => OutputFormat::Svg,
            Some("csv") => OutputFormat::Csv,
            Some("xy") | Some("dat") | Some("txt") => OutputFormat::Xy,
            _ => OutputFormat::Png,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 输出参数
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output file (plot or data); omit to only print a summary table
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot
    #[arg(long)]
    pub title: Option<String>,
}

impl OutputArgs {
    /// 输出路径与格式
    pub fn target(&self) -> Option<(&Path, OutputFormat)> {
        self.output.as_deref().map(|path| {
            let format = self
                .format
                .unwrap_or_else(|| OutputFormat::from_extension(path));
            (path, format)
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn title_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(default)
    }
}
