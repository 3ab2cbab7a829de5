//! # propagate 子命令 CLI 定义
//!
//! 将给定能谱作为初始分布（正向）或探测到的最终分布（逆向）进行变换。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/propagate.rs`

use crate::cli::common::{AltitudeArgs, OutputFormat};

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 变换方向
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum Direction {
    /// Spectrum is the initial distribution at the start altitude
    #[default]
    Forward,
    /// Spectrum is the final distribution measured at the end altitude
    Backward,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// propagate 子命令参数
#[derive(Args, Debug)]
pub struct PropagateArgs {
    /// Input: spectrum file (CSV or XY) or directory containing spectrum files
    pub input: PathBuf,

    /// Output: file path (single mode, default "propagated.png") or directory
    /// (batch mode, default "propagated")
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Transform direction
    #[arg(short, long, value_enum, default_value_t = Direction::Forward)]
    pub direction: Direction,

    #[command(flatten)]
    pub altitude: AltitudeArgs,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot (default: spectrum file name)
    #[arg(long)]
    pub title: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode)
    #[arg(long, default_value = "*.csv,*.xy,*.dat")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

impl PropagateArgs {
    /// 输出路径：未指定时单文件模式写入 `propagated.png`，批量模式写入 `propagated/`
    pub fn output_or_default(&self, batch: bool) -> PathBuf {
        match (&self.output, batch) {
            (Some(path), _) => path.clone(),
            (None, false) => PathBuf::from("propagated.png"),
            (None, true) => PathBuf::from("propagated"),
        }
    }
}
