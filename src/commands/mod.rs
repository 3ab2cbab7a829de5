//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `xray/`, `batch/`, `utils/`
//! - 子模块: density, transmission, attenuate, surface, propagate

pub mod attenuate;
pub mod density;
pub mod propagate;
pub mod surface;
pub mod transmission;

use crate::cli::Commands;
use crate::error::Result;
use crate::utils::output;
use crate::xray::AttenuationModel;

/// 执行命令
pub fn run(cmd: Commands, model: &AttenuationModel) -> Result<()> {
    match cmd {
        Commands::Density(args) => density::execute(args),
        Commands::Transmission(args) => transmission::execute(args, model),
        Commands::Attenuate(args) => attenuate::execute(args, model),
        Commands::Surface(args) => surface::execute(args, model),
        Commands::Propagate(args) => propagate::execute(args, model),
    }
}

/// 打印高度区间与积分步长
fn print_interval(model: &AttenuationModel, start_altitude_m: i64, end_altitude_m: i64) {
    output::print_param("Start altitude", &format!("{} m", start_altitude_m));
    output::print_param("End altitude", &format!("{} m", end_altitude_m));
    output::print_param("Integration step", &format!("{} m", model.step_m()));
}
