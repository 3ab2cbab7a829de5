//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `density`: 大气密度剖面
//! - `transmission`: 透射率-能量曲线
//! - `attenuate`: 合成能谱的衰减前后对比
//! - `surface`: 能谱随高度的演化
//! - `propagate`: 对给定能谱做正向/逆向变换（单文件或批量）
//!
//! 数值参数（积分步长、逆变换阈值）为全局参数，也可由环境变量提供。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: common, simulate, propagate

pub mod common;
pub mod propagate;
pub mod simulate;

use crate::error::Result;
use crate::xray::column::DEFAULT_STEP_M;
use crate::xray::model::{
    AttenuationModel, ModelConfig, DEFAULT_MAX_RECONSTRUCTED, DEFAULT_MIN_TRANSMISSION,
};

use clap::{Args, Parser, Subcommand};

/// xatten - X 射线高层大气衰减模拟
#[derive(Parser)]
#[command(name = "xatten")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Model X-ray attenuation through the upper atmosphere", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Tabulate air density of the standard atmosphere
    Density(simulate::DensityArgs),

    /// Transmission percentage for every photon energy (1-125 keV)
    Transmission(simulate::TransmissionArgs),

    /// Attenuate a synthetic exponential-decay spectrum (initial vs final)
    Attenuate(simulate::AttenuateArgs),

    /// Evolution of a synthetic spectrum over altitude (surface plot)
    Surface(simulate::SurfaceArgs),

    /// Use a supplied spectrum as the initial (forward) or final (backward) distribution
    Propagate(propagate::PropagateArgs),
}

/// 模型数值参数
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Integration step for the column density, in meters
    #[arg(long, global = true, env = "XATTEN_STEP", default_value_t = DEFAULT_STEP_M, allow_negative_numbers = true)]
    pub step: i64,

    /// Transmission below which the backward transform is undefined
    #[arg(long, global = true, env = "XATTEN_MIN_TRANSMISSION", default_value_t = DEFAULT_MIN_TRANSMISSION)]
    pub min_transmission: f64,

    /// Reconstructed intensity above which the backward transform is undefined
    #[arg(long, global = true, env = "XATTEN_MAX_INTENSITY", default_value_t = DEFAULT_MAX_RECONSTRUCTED)]
    pub max_intensity: f64,
}

impl ModelArgs {
    /// 构造模型配置
    pub fn config(&self) -> ModelConfig {
        ModelConfig {
            step_m: self.step,
            min_transmission: self.min_transmission,
            max_reconstructed: self.max_intensity,
        }
    }

    /// 构造并校验模型
    pub fn build(&self) -> Result<AttenuationModel> {
        AttenuationModel::new(self.config())
    }
}
